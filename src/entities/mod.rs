pub mod prelude;

pub mod employees;
