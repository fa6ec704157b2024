pub mod cohort;
pub mod hit;
pub mod library;
pub mod records;

// re-export for cleaner imports
pub use self::cohort::{Cohort, CohortKey, cohort_name};
pub use self::hit::{HitRow, HitTable};
pub use self::library::{Library, LibraryPartition, LibraryRole};
pub use self::records::{OverlapRecord, RecoveryRecord};
