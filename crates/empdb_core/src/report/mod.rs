//! Analytical reporting over the employee schema.
//!
//! # Responsibility
//! - Expose the eight fixed reporting queries as typed functions.
//! - Bundle a full run of all eight for printing or serialization.
//!
//! # Invariants
//! - Reports are read-only and idempotent.

pub mod queries;

use queries::{
    department_managers, employee_departments, employee_salaries, employees_hired_in_1986,
    hercules_b_employees, last_name_frequencies, sales_and_development_employees,
    sales_employees, EmployeeDepartmentRow, EmployeeSalaryRow, HireRow, LastNameCount,
    ManagerRow, NamedEmployeeRow, ReportResult,
};
use rusqlite::Connection;
use serde::Serialize;

/// Results of all eight reports, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSet {
    pub employee_salaries: Vec<EmployeeSalaryRow>,
    pub hired_in_1986: Vec<HireRow>,
    pub department_managers: Vec<ManagerRow>,
    pub employee_departments: Vec<EmployeeDepartmentRow>,
    pub hercules_b: Vec<NamedEmployeeRow>,
    pub sales: Vec<EmployeeDepartmentRow>,
    pub sales_and_development: Vec<EmployeeDepartmentRow>,
    pub last_name_frequencies: Vec<LastNameCount>,
}

impl ReportSet {
    /// `(title, row count)` for each report, in report order.
    pub fn summary(&self) -> [(&'static str, usize); 8] {
        [
            ("employee salaries", self.employee_salaries.len()),
            ("hired in 1986", self.hired_in_1986.len()),
            ("department managers", self.department_managers.len()),
            ("employee departments", self.employee_departments.len()),
            ("Hercules B.", self.hercules_b.len()),
            ("Sales", self.sales.len()),
            ("Sales and Development", self.sales_and_development.len()),
            ("last name frequencies", self.last_name_frequencies.len()),
        ]
    }
}

/// Runs every report against `conn`.
pub fn run_all(conn: &Connection) -> ReportResult<ReportSet> {
    Ok(ReportSet {
        employee_salaries: employee_salaries(conn)?,
        hired_in_1986: employees_hired_in_1986(conn)?,
        department_managers: department_managers(conn)?,
        employee_departments: employee_departments(conn)?,
        hercules_b: hercules_b_employees(conn)?,
        sales: sales_employees(conn)?,
        sales_and_development: sales_and_development_employees(conn)?,
        last_name_frequencies: last_name_frequencies(conn)?,
    })
}
