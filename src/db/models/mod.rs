//! Database Models

// Serde helpers
pub mod serde_helpers;

// Identity
pub mod employee;

// Onboarding dependents
pub mod schedule;
pub mod status;
pub mod timeoff;

// Daily operations
pub mod attendance;

// Records
pub mod payroll;
pub mod personal_info;

// Re-exports
pub use attendance::{Attendance, AttendanceStatus};
pub use employee::{
    Employee, EmployeeId, EmployeeRegistration, EmployeeUpdate, RegisteredEmployee, Role,
};
pub use payroll::{
    BankDetails, BankDetailsUpsert, PfContribution, PfContributionCreate, SalaryStructure,
    SalaryStructureCreate, TaxDeduction, TaxDeductionCreate,
};
pub use personal_info::{PersonalInfo, PersonalInfoUpsert};
pub use schedule::WorkingSchedule;
pub use status::{PresenceStatus, StatusIndicator, StatusTracker};
pub use timeoff::{
    RequestStatus, TimeOffApproval, TimeOffBalance, TimeOffRequest, TimeOffRequestCreate,
    TimeOffType,
};
