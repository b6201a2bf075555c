//! Employee dataset records.
//!
//! # Responsibility
//! - Mirror the six schema tables as plain records.
//! - Provide write-path validation for each record.
//!
//! # Invariants
//! - `emp_no` and `dept_no` are the only identities; junction rows have none.
//! - Dates are calendar dates without time zone, stored as `YYYY-MM-DD`.

use super::validation::{require_emp_no, require_period, require_text, ValidationError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Employee number, the primary key of `employees`.
pub type EmpNo = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub emp_no: EmpNo,
    pub birth_date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub hire_date: NaiveDate,
}

impl Employee {
    pub fn hire_year(&self) -> i32 {
        self.hire_date.year()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_emp_no(self.emp_no)?;
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        Ok(())
    }
}

/// A job title held by an employee over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub emp_no: EmpNo,
    pub title: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl Title {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_emp_no(self.emp_no)?;
        require_text("title", &self.title)?;
        require_period(self.from_date, self.to_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salary {
    pub emp_no: EmpNo,
    pub salary: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl Salary {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_emp_no(self.emp_no)?;
        if self.salary < 0 {
            return Err(ValidationError::NegativeSalary(self.salary));
        }
        require_period(self.from_date, self.to_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub dept_no: String,
    pub dept_name: String,
}

impl Department {
    pub fn new(dept_no: impl Into<String>, dept_name: impl Into<String>) -> Self {
        Self {
            dept_no: dept_no.into(),
            dept_name: dept_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("dept_no", &self.dept_no)?;
        require_text("dept_name", &self.dept_name)
    }
}

/// Membership of an employee in a department over a period (`dept_emp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeptEmployee {
    pub emp_no: EmpNo,
    pub dept_no: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl DeptEmployee {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_emp_no(self.emp_no)?;
        require_text("dept_no", &self.dept_no)?;
        require_period(self.from_date, self.to_date)
    }
}

/// Designates a department manager for a period (`dept_manager`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeptManager {
    pub dept_no: String,
    pub emp_no: EmpNo,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl DeptManager {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("dept_no", &self.dept_no)?;
        require_emp_no(self.emp_no)?;
        require_period(self.from_date, self.to_date)
    }
}
