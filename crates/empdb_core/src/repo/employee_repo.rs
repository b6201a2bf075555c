//! Employee dataset repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Seed the six employee tables with validated rows.
//! - Provide point reads used by callers that need one record back.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Bulk seeding writes parents before children inside one transaction, so a
//!   foreign-key failure leaves no partial dataset behind.

use crate::db::DbError;
use crate::model::employee::{
    Department, DeptEmployee, DeptManager, EmpNo, Employee, Gender, Salary, Title,
};
use crate::model::validation::ValidationError;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from_sqlite(value))
    }
}

/// A complete set of rows for the six employee tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub titles: Vec<Title>,
    pub salaries: Vec<Salary>,
    pub dept_employees: Vec<DeptEmployee>,
    pub dept_managers: Vec<DeptManager>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.employees.len()
            + self.departments.len()
            + self.titles.len()
            + self.salaries.len()
            + self.dept_employees.len()
            + self.dept_managers.len()
    }
}

/// Repository interface for the employee dataset.
pub trait EmployeeRepository {
    fn insert_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn insert_department(&self, department: &Department) -> RepoResult<()>;
    fn insert_title(&self, title: &Title) -> RepoResult<()>;
    fn insert_salary(&self, salary: &Salary) -> RepoResult<()>;
    fn insert_dept_employee(&self, row: &DeptEmployee) -> RepoResult<()>;
    fn insert_dept_manager(&self, row: &DeptManager) -> RepoResult<()>;
    fn insert_dataset(&self, dataset: &Dataset) -> RepoResult<usize>;
    fn get_employee(&self, emp_no: EmpNo) -> RepoResult<Option<Employee>>;
    fn get_department(&self, dept_no: &str) -> RepoResult<Option<Department>>;
    fn count_rows(&self, table: EmployeeTable) -> RepoResult<u64>;
}

/// The six schema tables, for row counting without string table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeTable {
    Employees,
    Titles,
    Salaries,
    Departments,
    DeptEmp,
    DeptManager,
}

impl EmployeeTable {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Titles => "titles",
            Self::Salaries => "salaries",
            Self::Departments => "departments",
            Self::DeptEmp => "dept_emp",
            Self::DeptManager => "dept_manager",
        }
    }
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (
                emp_no,
                birth_date,
                first_name,
                last_name,
                gender,
                hire_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                employee.emp_no,
                employee.birth_date,
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.gender.as_db_str(),
                employee.hire_date,
            ],
        )?;
        Ok(())
    }

    fn insert_department(&self, department: &Department) -> RepoResult<()> {
        department.validate()?;

        self.conn.execute(
            "INSERT INTO departments (dept_no, dept_name) VALUES (?1, ?2);",
            params![department.dept_no.as_str(), department.dept_name.as_str()],
        )?;
        Ok(())
    }

    fn insert_title(&self, title: &Title) -> RepoResult<()> {
        title.validate()?;

        self.conn.execute(
            "INSERT INTO titles (emp_no, title, from_date, to_date) VALUES (?1, ?2, ?3, ?4);",
            params![
                title.emp_no,
                title.title.as_str(),
                title.from_date,
                title.to_date
            ],
        )?;
        Ok(())
    }

    fn insert_salary(&self, salary: &Salary) -> RepoResult<()> {
        salary.validate()?;

        self.conn.execute(
            "INSERT INTO salaries (emp_no, salary, from_date, to_date) VALUES (?1, ?2, ?3, ?4);",
            params![
                salary.emp_no,
                salary.salary,
                salary.from_date,
                salary.to_date
            ],
        )?;
        Ok(())
    }

    fn insert_dept_employee(&self, row: &DeptEmployee) -> RepoResult<()> {
        row.validate()?;

        self.conn.execute(
            "INSERT INTO dept_emp (emp_no, dept_no, from_date, to_date) VALUES (?1, ?2, ?3, ?4);",
            params![row.emp_no, row.dept_no.as_str(), row.from_date, row.to_date],
        )?;
        Ok(())
    }

    fn insert_dept_manager(&self, row: &DeptManager) -> RepoResult<()> {
        row.validate()?;

        self.conn.execute(
            "INSERT INTO dept_manager (dept_no, emp_no, from_date, to_date) VALUES (?1, ?2, ?3, ?4);",
            params![row.dept_no.as_str(), row.emp_no, row.from_date, row.to_date],
        )?;
        Ok(())
    }

    fn insert_dataset(&self, dataset: &Dataset) -> RepoResult<usize> {
        let started_at = Instant::now();
        let tx = self.conn.unchecked_transaction()?;
        let staged = SqliteEmployeeRepository::new(&tx);

        for employee in &dataset.employees {
            staged.insert_employee(employee)?;
        }
        for department in &dataset.departments {
            staged.insert_department(department)?;
        }
        for title in &dataset.titles {
            staged.insert_title(title)?;
        }
        for salary in &dataset.salaries {
            staged.insert_salary(salary)?;
        }
        for row in &dataset.dept_employees {
            staged.insert_dept_employee(row)?;
        }
        for row in &dataset.dept_managers {
            staged.insert_dept_manager(row)?;
        }
        tx.commit()?;

        let rows = dataset.row_count();
        info!(
            "event=dataset_seed module=repo status=ok rows={} duration_ms={}",
            rows,
            started_at.elapsed().as_millis()
        );
        Ok(rows)
    }

    fn get_employee(&self, emp_no: EmpNo) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT emp_no, birth_date, first_name, last_name, gender, hire_date
             FROM employees
             WHERE emp_no = ?1;",
        )?;

        let mut rows = stmt.query([emp_no])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn get_department(&self, dept_no: &str) -> RepoResult<Option<Department>> {
        let department = self
            .conn
            .query_row(
                "SELECT dept_no, dept_name FROM departments WHERE dept_no = ?1;",
                [dept_no],
                |row| {
                    Ok(Department {
                        dept_no: row.get("dept_no")?,
                        dept_name: row.get("dept_name")?,
                    })
                },
            )
            .optional()?;
        Ok(department)
    }

    fn count_rows(&self, table: EmployeeTable) -> RepoResult<u64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", table.as_str()),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }
}

pub(crate) fn parse_gender(value: &str, column: &str) -> Result<Gender, String> {
    Gender::from_db_str(value).ok_or_else(|| format!("invalid gender `{value}` in {column}"))
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let gender_text: String = row.get("gender")?;
    let gender = parse_gender(&gender_text, "employees.gender").map_err(RepoError::InvalidData)?;

    Ok(Employee {
        emp_no: row.get("emp_no")?,
        birth_date: row.get("birth_date")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        gender,
        hire_date: row.get("hire_date")?,
    })
}
