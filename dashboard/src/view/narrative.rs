//! Static dashboard text. `**bold**` spans are rendered as `<strong>` by the page writer.

use crate::models::{Antibiotic, Selection};

pub const PAGE_TITLE: &str = "Effectiveness of Different Antibiotics by Gram Stain";

pub const INTRODUCTION: &str = "Let's explore Burtin's antibiotic dataset, which records the \
minimum inhibitory concentration (MIC) of 3 antibiotics (Penicillin, Streptomycin, Neomycin) \
against 16 bacterial species. Does the Gram staining of a bacterium affect how well an \
antibiotic works? Let's find out!";

pub const INFO_HEADING: &str = "Additional Information!";
pub const EXPLORE_HEADING: &str = "Exploration of different antibiotics on various bacteria!";
pub const SELECTOR_PROMPT: &str = "Pick an antibiotic:";
pub const INSIGHTS_HEADING: &str = "Key Insights";

pub struct InfoBlock {
    pub heading: &'static str,
    pub bullets: &'static [&'static str],
}

/// A collapsible explanatory section.
pub struct InfoSection {
    pub title: &'static str,
    pub blocks: &'static [InfoBlock],
}

pub const INFO_SECTIONS: [InfoSection; 3] = [
    InfoSection {
        title: "Antibiotic and Effectiveness",
        blocks: &[
            InfoBlock {
                heading: "What is an antibiotic?",
                bullets: &["An antibiotic is a substance that kills bacteria or inhibits their \
                    growth. It targets bacterial processes or structures that bacteria need to \
                    survive while leaving human cells unharmed. **In simple terms, it is a \
                    medicine that fights bacterial infections by killing harmful bacteria or \
                    stopping them from multiplying.**"],
            },
            InfoBlock {
                heading: "What makes antibiotics effective?",
                bullets: &[
                    "They attack parts of bacteria that human cells don't have.",
                    "They reach the right concentration at the infection site.",
                    "The bacteria haven't become resistant to them yet!",
                ],
            },
        ],
    },
    InfoSection {
        title: "Gram Stain Difference",
        blocks: &[
            InfoBlock {
                heading: "Gram staining: what's the difference?",
                bullets: &["Scientists use a dye test to divide bacteria into two main groups \
                    by cell-wall structure: purple bacteria (Gram-positive) and pink bacteria \
                    (Gram-negative)."],
            },
            InfoBlock {
                heading: "Gram-positive",
                bullets: &[
                    "Have a thick, strong outer wall.",
                    "Turn purple when stained with the dye.",
                    "Examples: strep throat bacteria, food poisoning bacteria.",
                ],
            },
            InfoBlock {
                heading: "Gram-negative",
                bullets: &[
                    "Have a thinner wall with an extra protective layer.",
                    "Turn pink when stained with the dye.",
                    "Often harder to kill with antibiotics because of the extra layer.",
                    "Examples: E. coli, salmonella.",
                ],
            },
        ],
    },
    InfoSection {
        title: "3 Antibiotics: Penicillin, Streptomycin, Neomycin",
        blocks: &[
            InfoBlock {
                heading: "Penicillin",
                bullets: &[
                    "The first antibiotic ever discovered, by accident, on mouldy bread!",
                    "Works by breaking down the bacterium's protective wall.",
                    "Best against Gram-positive bacteria.",
                ],
            },
            InfoBlock {
                heading: "Streptomycin",
                bullets: &[
                    "Stops bacteria from making the proteins they need to survive.",
                    "Works against both Gram-negative and Gram-positive bacteria.",
                    "Was important for treating tuberculosis (TB)!",
                ],
            },
            InfoBlock {
                heading: "Neomycin",
                bullets: &[
                    "Stops bacteria from making proteins.",
                    "Usually used in creams and ointments for cuts and scrapes.",
                    "Too harsh to take as a pill, so it's applied to the skin!",
                ],
            },
        ],
    },
];

pub fn headline(antibiotic: Antibiotic) -> &'static str {
    match antibiotic {
        Antibiotic::Penicillin => {
            "Penicillin Is Highly Effective Against Gram-Positive Bacteria, But Fails Against Gram-Negative"
        }
        Antibiotic::Streptomycin => {
            "Streptomycin Shows Moderate Effectiveness Across Both Gram Types, With Some Variation"
        }
        Antibiotic::Neomycin => {
            "Neomycin Performs Well Across Most Bacteria, Especially Gram-Negative Stains"
        }
    }
}

const PENICILLIN_INSIGHTS: &[&str] = &[
    "**Penicillin** is **highly effective** against **Gram-positive bacteria**, showing strong inhibition.",
    "It is **mostly ineffective** against **Gram-negative bacteria**.",
    "This matches its known mechanism: it targets the peptidoglycan in Gram-positive cell walls.",
];

const STREPTOMYCIN_INSIGHTS: &[&str] = &[
    "**Streptomycin** shows **moderate, broad-spectrum effectiveness**.",
    "Some Gram-positive and Gram-negative species respond well, but resistance is noticeable.",
    "It performs better than Penicillin on several Gram-negative stains.",
];

const NEOMYCIN_INSIGHTS: &[&str] = &[
    "**Neomycin** has **broad-spectrum potency**, especially against **Gram-negative bacteria**.",
    "Some Gram-positive species show reduced sensitivity.",
    "It is among the strongest overall in this dataset.",
];

const OVERVIEW_INSIGHTS: &[&str] = &[
    "**Knowing whether bacteria are Gram-positive or Gram-negative is crucial for choosing the \
     right antibiotic.** Doctors run Gram-staining tests to identify the type of bacteria before \
     prescribing treatment, which raises the chance of success and lowers the risk of resistance.",
    "**Penicillin is very effective against Gram-positive bacteria.** Their thick cell walls are \
     an easy target for penicillin to break down, while Gram-negative bacteria are protected by \
     their outer membrane.",
    "**Gram-negative bacteria generally resist more antibiotics.** Their double-layered cell wall \
     acts like extra armour, making it harder for antibiotics to reach their targets, which is \
     why Gram-negative infections can be harder to treat.",
    "**Streptomycin and Neomycin cover a broader spectrum than Penicillin.** They attack both \
     Gram-positive and Gram-negative bacteria by disrupting protein production, which makes them \
     useful when the type of bacteria causing an infection is unknown.",
];

/// Key-insight bullets shown under the charts for `selection`.
pub fn insights(selection: Selection) -> &'static [&'static str] {
    match selection.antibiotic() {
        Some(Antibiotic::Penicillin) => PENICILLIN_INSIGHTS,
        Some(Antibiotic::Streptomycin) => STREPTOMYCIN_INSIGHTS,
        Some(Antibiotic::Neomycin) => NEOMYCIN_INSIGHTS,
        None => OVERVIEW_INSIGHTS,
    }
}
