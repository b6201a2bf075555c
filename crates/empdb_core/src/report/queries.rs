//! The eight read-only reporting queries over the employee schema.
//!
//! # Responsibility
//! - Run fixed joins, filters and groupings and decode them into typed rows.
//!
//! # Invariants
//! - Every query is a single `SELECT`; nothing here mutates the database.
//! - Row order is deterministic for identical data.

use crate::db::DbError;
use crate::model::employee::{EmpNo, Gender};
use chrono::NaiveDate;
use log::info;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Hire year used by the fixed "hired in 1986" report.
pub const HIRE_YEAR: i32 = 1986;
pub const HERCULES_FIRST_NAME: &str = "Hercules";
pub const HERCULES_LAST_NAME_PREFIX: &str = "B";
pub const SALES_DEPARTMENT: &str = "Sales";
pub const DEVELOPMENT_DEPARTMENT: &str = "Development";

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug)]
pub enum ReportError {
    Db(DbError),
    InvalidData(String),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid report row: {message}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for ReportError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ReportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from_sqlite(value))
    }
}

/// Query 1 row: employee with a salary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSalaryRow {
    pub emp_no: EmpNo,
    pub last_name: String,
    pub first_name: String,
    pub gender: Gender,
    pub salary: i64,
}

/// Query 2 row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HireRow {
    pub emp_no: EmpNo,
    pub first_name: String,
    pub last_name: String,
    pub hire_date: NaiveDate,
}

/// Query 3 row: one management period of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerRow {
    pub dept_no: String,
    pub dept_name: String,
    pub emp_no: EmpNo,
    pub last_name: String,
    pub first_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Rows of queries 4, 6 and 7.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeDepartmentRow {
    pub emp_no: EmpNo,
    pub last_name: String,
    pub first_name: String,
    pub dept_name: String,
}

/// Query 5 row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEmployeeRow {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

/// Query 8 row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastNameCount {
    pub last_name: String,
    pub frequency: u64,
}

/// Query 1: employees joined with their salaries.
pub fn employee_salaries(conn: &Connection) -> ReportResult<Vec<EmployeeSalaryRow>> {
    collect_rows(
        conn,
        "employee_salaries",
        "SELECT e.emp_no, e.last_name, e.first_name, e.gender, s.salary
         FROM employees AS e
         INNER JOIN salaries AS s ON s.emp_no = e.emp_no
         ORDER BY e.emp_no ASC, s.from_date ASC;",
        Vec::new(),
        |row| {
            Ok(EmployeeSalaryRow {
                emp_no: row.get("emp_no")?,
                last_name: row.get("last_name")?,
                first_name: row.get("first_name")?,
                gender: gender_column(row)?,
                salary: row.get("salary")?,
            })
        },
    )
}

/// Query 2: employees whose hire date falls in `year`.
pub fn employees_hired_in(conn: &Connection, year: i32) -> ReportResult<Vec<HireRow>> {
    collect_rows(
        conn,
        "employees_hired_in",
        "SELECT emp_no, first_name, last_name, hire_date
         FROM employees
         WHERE CAST(strftime('%Y', hire_date) AS INTEGER) = ?1
         ORDER BY hire_date ASC, emp_no ASC;",
        vec![Value::Integer(i64::from(year))],
        |row| {
            Ok(HireRow {
                emp_no: row.get("emp_no")?,
                first_name: row.get("first_name")?,
                last_name: row.get("last_name")?,
                hire_date: row.get("hire_date")?,
            })
        },
    )
}

pub fn employees_hired_in_1986(conn: &Connection) -> ReportResult<Vec<HireRow>> {
    employees_hired_in(conn, HIRE_YEAR)
}

/// Query 3: department managers with their personal details.
pub fn department_managers(conn: &Connection) -> ReportResult<Vec<ManagerRow>> {
    collect_rows(
        conn,
        "department_managers",
        "SELECT d.dept_no, d.dept_name, e.emp_no, e.last_name, e.first_name,
                dm.from_date, dm.to_date
         FROM departments AS d
         INNER JOIN dept_manager AS dm ON dm.dept_no = d.dept_no
         INNER JOIN employees AS e ON e.emp_no = dm.emp_no
         ORDER BY d.dept_no ASC, dm.from_date ASC, e.emp_no ASC;",
        Vec::new(),
        |row| {
            Ok(ManagerRow {
                dept_no: row.get("dept_no")?,
                dept_name: row.get("dept_name")?,
                emp_no: row.get("emp_no")?,
                last_name: row.get("last_name")?,
                first_name: row.get("first_name")?,
                from_date: row.get("from_date")?,
                to_date: row.get("to_date")?,
            })
        },
    )
}

/// Query 4: every employee with the department(s) they belong to.
pub fn employee_departments(conn: &Connection) -> ReportResult<Vec<EmployeeDepartmentRow>> {
    collect_rows(
        conn,
        "employee_departments",
        "SELECT e.emp_no, e.last_name, e.first_name, d.dept_name
         FROM employees AS e
         INNER JOIN dept_emp AS de ON de.emp_no = e.emp_no
         INNER JOIN departments AS d ON d.dept_no = de.dept_no
         ORDER BY e.emp_no ASC, d.dept_name ASC;",
        Vec::new(),
        parse_employee_department,
    )
}

/// Query 5: exact first name, case-sensitive last-name prefix.
pub fn employees_named(
    conn: &Connection,
    first_name: &str,
    last_name_prefix: &str,
) -> ReportResult<Vec<NamedEmployeeRow>> {
    collect_rows(
        conn,
        "employees_named",
        "SELECT first_name, last_name, gender
         FROM employees
         WHERE first_name = ?1
           AND last_name GLOB ?2
         ORDER BY last_name ASC, emp_no ASC;",
        vec![
            Value::Text(first_name.to_string()),
            Value::Text(format!("{}*", escape_glob(last_name_prefix))),
        ],
        |row| {
            Ok(NamedEmployeeRow {
                first_name: row.get("first_name")?,
                last_name: row.get("last_name")?,
                gender: gender_column(row)?,
            })
        },
    )
}

pub fn hercules_b_employees(conn: &Connection) -> ReportResult<Vec<NamedEmployeeRow>> {
    employees_named(conn, HERCULES_FIRST_NAME, HERCULES_LAST_NAME_PREFIX)
}

/// Query 6: members of one department, by department name.
pub fn employees_in_department(
    conn: &Connection,
    dept_name: &str,
) -> ReportResult<Vec<EmployeeDepartmentRow>> {
    employees_in_departments(conn, &[dept_name])
}

pub fn sales_employees(conn: &Connection) -> ReportResult<Vec<EmployeeDepartmentRow>> {
    employees_in_department(conn, SALES_DEPARTMENT)
}

/// Query 7: members of any of the named departments.
///
/// Returns an empty list for an empty name list.
pub fn employees_in_departments(
    conn: &Connection,
    dept_names: &[&str],
) -> ReportResult<Vec<EmployeeDepartmentRow>> {
    if dept_names.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; dept_names.len()].join(", ");
    let sql = format!(
        "SELECT e.emp_no, e.last_name, e.first_name, d.dept_name
         FROM dept_emp AS de
         INNER JOIN departments AS d ON d.dept_no = de.dept_no
         INNER JOIN employees AS e ON e.emp_no = de.emp_no
         WHERE d.dept_name IN ({placeholders})
         ORDER BY e.emp_no ASC, d.dept_name ASC;"
    );
    let bind_values = dept_names
        .iter()
        .map(|name| Value::Text((*name).to_string()))
        .collect();

    collect_rows(
        conn,
        "employees_in_departments",
        &sql,
        bind_values,
        parse_employee_department,
    )
}

pub fn sales_and_development_employees(
    conn: &Connection,
) -> ReportResult<Vec<EmployeeDepartmentRow>> {
    employees_in_departments(conn, &[SALES_DEPARTMENT, DEVELOPMENT_DEPARTMENT])
}

/// Query 8: how many employees share each last name, most common first.
pub fn last_name_frequencies(conn: &Connection) -> ReportResult<Vec<LastNameCount>> {
    collect_rows(
        conn,
        "last_name_frequencies",
        "SELECT last_name, COUNT(*) AS frequency
         FROM employees
         GROUP BY last_name
         ORDER BY frequency DESC, last_name ASC;",
        Vec::new(),
        |row| {
            let frequency: i64 = row.get("frequency")?;
            Ok(LastNameCount {
                last_name: row.get("last_name")?,
                frequency: u64::try_from(frequency).map_err(|_| {
                    ReportError::InvalidData(format!("negative count {frequency}"))
                })?,
            })
        },
    )
}

fn collect_rows<T>(
    conn: &Connection,
    query_name: &'static str,
    sql: &str,
    bind_values: Vec<Value>,
    parse: impl Fn(&Row<'_>) -> ReportResult<T>,
) -> ReportResult<Vec<T>> {
    let started_at = Instant::now();
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut items = Vec::new();

    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }

    info!(
        "event=report_query module=report status=ok query={} rows={} duration_ms={}",
        query_name,
        items.len(),
        started_at.elapsed().as_millis()
    );
    Ok(items)
}

fn parse_employee_department(row: &Row<'_>) -> ReportResult<EmployeeDepartmentRow> {
    Ok(EmployeeDepartmentRow {
        emp_no: row.get("emp_no")?,
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        dept_name: row.get("dept_name")?,
    })
}

fn gender_column(row: &Row<'_>) -> ReportResult<Gender> {
    let value: String = row.get("gender")?;
    Gender::from_db_str(&value)
        .ok_or_else(|| ReportError::InvalidData(format!("invalid gender `{value}`")))
}

/// Escapes GLOB metacharacters so `prefix` matches literally.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        match ch {
            '*' => escaped.push_str("[*]"),
            '?' => escaped.push_str("[?]"),
            '[' => escaped.push_str("[[]"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_glob;

    #[test]
    fn escape_glob_brackets_metacharacters() {
        assert_eq!(escape_glob("B"), "B");
        assert_eq!(escape_glob("a*b?[c"), "a[*]b[?][[]c");
    }
}
