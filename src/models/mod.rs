pub mod employer;
pub mod snippet;
pub mod vacancy;
