pub mod compose;
pub mod narrative;
pub mod page;
pub mod site;
