pub mod enrollment;

pub use enrollment::{EnrollmentError, EnrollmentOutcome};
