pub mod employee_service;
pub mod employee_service_impl;
pub use employee_service::{EmployeeError, EmployeeService};
pub use employee_service_impl::SeaOrmEmployeeService;
