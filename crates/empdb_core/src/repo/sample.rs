//! Small bundled employee dataset for demos and report smoke runs.
//!
//! Rows are kept as literal text and parsed on demand, so a malformed entry
//! surfaces as `RepoError::InvalidData` instead of a panic.

use super::employee_repo::{parse_gender, Dataset, RepoError, RepoResult};
use crate::model::employee::{
    Department, DeptEmployee, DeptManager, EmpNo, Employee, Salary, Title,
};
use chrono::NaiveDate;

const CURRENT: &str = "9999-01-01";

const DEPARTMENTS: &[(&str, &str)] = &[
    ("d001", "Marketing"),
    ("d002", "Finance"),
    ("d003", "Human Resources"),
    ("d004", "Production"),
    ("d005", "Development"),
    ("d006", "Quality Management"),
    ("d007", "Sales"),
    ("d008", "Research"),
    ("d009", "Customer Service"),
];

// emp_no, birth_date, first_name, last_name, gender, hire_date, dept_no, salary, title
const EMPLOYEES: &[(EmpNo, &str, &str, &str, &str, &str, &str, i64, &str)] = &[
    (10001, "1953-09-02", "Georgi", "Facello", "M", "1986-06-26", "d005", 88958, "Senior Engineer"),
    (10002, "1964-06-02", "Bezalel", "Simmel", "F", "1985-11-21", "d007", 72527, "Staff"),
    (10003, "1959-12-03", "Parto", "Bamford", "M", "1986-08-28", "d004", 43311, "Senior Engineer"),
    (10004, "1954-05-01", "Chirstian", "Koblick", "M", "1986-12-01", "d004", 74057, "Engineer"),
    (10005, "1955-01-21", "Kyoichi", "Maliniak", "M", "1989-09-12", "d003", 94692, "Senior Staff"),
    (10006, "1953-04-20", "Anneke", "Preusig", "F", "1989-06-02", "d005", 59755, "Senior Engineer"),
    (10007, "1957-05-23", "Tzvetan", "Zielinski", "F", "1989-02-10", "d008", 88070, "Senior Staff"),
    (10008, "1958-02-19", "Saniya", "Kalloufi", "M", "1994-09-15", "d005", 52668, "Assistant Engineer"),
    (10009, "1952-04-19", "Sumant", "Peac", "F", "1985-02-18", "d006", 94409, "Senior Engineer"),
    (10010, "1963-06-01", "Duangkaew", "Piveteau", "F", "1989-08-24", "d006", 80324, "Engineer"),
    (10011, "1953-11-07", "Mary", "Sluis", "F", "1990-01-22", "d009", 42365, "Staff"),
    (10012, "1960-10-04", "Patricio", "Bridgland", "M", "1992-12-18", "d005", 54423, "Senior Engineer"),
    (10013, "1963-06-07", "Eberhardt", "Terkki", "M", "1985-10-20", "d003", 68901, "Senior Staff"),
    (10014, "1956-02-12", "Berni", "Genin", "M", "1987-03-11", "d005", 60598, "Engineer"),
    (10015, "1959-08-19", "Guoxiang", "Nooteboom", "M", "1987-07-02", "d008", 40000, "Senior Staff"),
    (10016, "1961-05-02", "Kazuhito", "Facello", "M", "1995-01-27", "d007", 70889, "Staff"),
    (10017, "1958-07-06", "Cristinel", "Bamford", "F", "1993-08-03", "d001", 71380, "Senior Staff"),
    (10018, "1954-06-19", "Kazuhide", "Peha", "F", "1987-04-03", "d005", 55881, "Senior Engineer"),
    (10019, "1953-01-23", "Lillian", "Facello", "M", "1999-04-30", "d008", 44276, "Staff"),
    (10020, "1952-12-24", "Mayuko", "Warwick", "M", "1991-01-26", "d005", 40031, "Engineer"),
    (10021, "1960-02-20", "Ramzi", "Erde", "M", "1988-02-10", "d005", 55025, "Technique Leader"),
    (10022, "1952-07-08", "Shahaf", "Famili", "M", "1995-08-22", "d005", 39935, "Engineer"),
    (10023, "1953-09-29", "Bojan", "Montemayor", "F", "1989-12-17", "d005", 47883, "Engineer"),
    (10024, "1958-09-05", "Suzette", "Pettey", "F", "1997-05-19", "d004", 96646, "Assistant Engineer"),
    (10025, "1958-10-31", "Prasadram", "Heyers", "M", "1987-08-17", "d005", 40000, "Technique Leader"),
    (10026, "1953-04-03", "Yongqiao", "Berztiss", "M", "1995-03-20", "d004", 47585, "Engineer"),
    (10027, "1962-07-10", "Divier", "Reistad", "F", "1989-07-07", "d005", 39520, "Staff"),
    (10028, "1963-11-26", "Domenick", "Tempesti", "M", "1991-10-22", "d005", 48859, "Engineer"),
    (10029, "1956-12-13", "Otmar", "Herbst", "M", "1985-11-20", "d004", 63163, "Staff"),
    (10030, "1958-07-14", "Elvis", "Demeyer", "M", "1994-02-17", "d004", 66956, "Engineer"),
    (10031, "1959-01-27", "Karsten", "Joslin", "M", "1991-09-01", "d005", 40000, "Staff"),
    (10032, "1960-08-09", "Jeong", "Reistad", "F", "1990-06-20", "d004", 48426, "Engineer"),
    (10033, "1956-11-14", "Arif", "Merlo", "M", "1987-03-18", "d006", 51596, "Staff"),
    (10034, "1962-12-29", "Bader", "Swan", "M", "1988-09-21", "d007", 53257, "Staff"),
    (10035, "1953-02-08", "Alain", "Chappelet", "M", "1988-09-05", "d004", 41538, "Engineer"),
    (10036, "1959-08-10", "Adamantios", "Portugali", "M", "1992-01-03", "d007", 42319, "Staff"),
    (10037, "1963-07-22", "Pradeep", "Makrucki", "M", "1990-12-05", "d005", 39765, "Engineer"),
    (10038, "1960-07-20", "Huan", "Lortz", "M", "1989-09-20", "d009", 40000, "Senior Staff"),
    (10039, "1959-10-01", "Alejandro", "Brender", "M", "1988-01-19", "d004", 40000, "Staff"),
    (10040, "1959-09-13", "Weiyi", "Meriste", "F", "1993-02-14", "d005", 37396, "Engineer"),
    (12001, "1956-04-16", "Hercules", "Baer", "M", "1985-02-26", "d007", 62125, "Senior Staff"),
    (12002, "1960-02-04", "Hercules", "Bain", "F", "1986-03-12", "d005", 48101, "Engineer"),
    (12003, "1962-10-12", "Hercules", "Akiyama", "M", "1990-01-01", "d007", 45012, "Staff"),
    (12004, "1961-01-05", "Herculano", "Birch", "M", "1991-05-05", "d002", 51040, "Staff"),
    (12005, "1955-03-14", "Hercules", "Benzmuller", "M", "1993-07-20", "d002", 57330, "Senior Staff"),
];

// dept_no, emp_no, from_date
const MANAGERS: &[(&str, EmpNo, &str)] = &[
    ("d004", 10004, "1991-09-12"),
    ("d005", 10001, "1992-04-25"),
    ("d007", 10002, "1991-03-07"),
    ("d008", 10007, "1991-04-08"),
];

/// Builds the bundled dataset.
pub fn sample_dataset() -> RepoResult<Dataset> {
    let current = parse_date(CURRENT)?;
    let mut dataset = Dataset {
        departments: DEPARTMENTS
            .iter()
            .map(|(dept_no, dept_name)| Department::new(*dept_no, *dept_name))
            .collect(),
        ..Dataset::default()
    };

    for &(emp_no, birth, first, last, gender, hired, dept_no, salary, title) in EMPLOYEES {
        let hire_date = parse_date(hired)?;
        dataset.employees.push(Employee {
            emp_no,
            birth_date: parse_date(birth)?,
            first_name: first.to_string(),
            last_name: last.to_string(),
            gender: parse_gender(gender, "sample employees").map_err(RepoError::InvalidData)?,
            hire_date,
        });
        dataset.titles.push(Title {
            emp_no,
            title: title.to_string(),
            from_date: hire_date,
            to_date: current,
        });
        dataset.salaries.push(Salary {
            emp_no,
            salary,
            from_date: hire_date,
            to_date: current,
        });
        dataset.dept_employees.push(DeptEmployee {
            emp_no,
            dept_no: dept_no.to_string(),
            from_date: hire_date,
            to_date: current,
        });
    }

    for &(dept_no, emp_no, from) in MANAGERS {
        dataset.dept_managers.push(DeptManager {
            dept_no: dept_no.to_string(),
            emp_no,
            from_date: parse_date(from)?,
            to_date: current,
        });
    }

    Ok(dataset)
}

fn parse_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| RepoError::InvalidData(format!("invalid sample date `{value}`: {err}")))
}
