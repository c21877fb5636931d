use crate::models::Antibiotic;

/// Fixed callout for a single-antibiotic chart. Offsets are in pixels, added after the
/// callout is anchored to its data position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStyle {
    pub message: &'static str,
    pub dx: f64,
    pub dy: f64,
}

pub const ANNOTATION_FONT_SIZE: f64 = 14.0;

const PENICILLIN: AnnotationStyle = AnnotationStyle {
    message: "High effectiveness shown for Gram-Positive",
    dx: 175.0,
    dy: 40.0,
};

const STREPTOMYCIN: AnnotationStyle = AnnotationStyle {
    message: "Effectiveness varies for Gram-Positive/Negative",
    dx: 190.0,
    dy: 40.0,
};

const NEOMYCIN: AnnotationStyle = AnnotationStyle {
    message: "Broadly effective for Gram-Positive/Negative",
    dx: 190.0,
    dy: 60.0,
};

pub fn annotation_for(antibiotic: Antibiotic) -> &'static AnnotationStyle {
    match antibiotic {
        Antibiotic::Penicillin => &PENICILLIN,
        Antibiotic::Streptomycin => &STREPTOMYCIN,
        Antibiotic::Neomycin => &NEOMYCIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_antibiotic_has_a_distinct_message() {
        let messages: Vec<&str> = Antibiotic::ALL.iter().map(|a| annotation_for(*a).message).collect();
        assert_eq!(messages.len(), 3);
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn offsets_differ_per_antibiotic() {
        assert_eq!(annotation_for(Antibiotic::Penicillin).dx, 175.0);
        assert_eq!(annotation_for(Antibiotic::Streptomycin).dx, 190.0);
        assert_eq!(annotation_for(Antibiotic::Neomycin).dy, 60.0);
        assert_eq!(annotation_for(Antibiotic::Streptomycin).dy, 40.0);
    }
}
