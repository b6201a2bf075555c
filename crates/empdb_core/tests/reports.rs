use chrono::{Datelike, NaiveDate};
use empdb_core::db::open_db_in_memory;
use empdb_core::report::queries::{
    department_managers, employee_departments, employee_salaries, employees_hired_in,
    employees_hired_in_1986, employees_in_departments, hercules_b_employees,
    last_name_frequencies, sales_and_development_employees, sales_employees,
};
use empdb_core::{
    run_all, sample_dataset, Employee, EmployeeRepository, Gender, SqliteEmployeeRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn seeded() -> Connection {
    let conn = open_db_in_memory().unwrap();
    SqliteEmployeeRepository::new(&conn)
        .insert_dataset(&sample_dataset().unwrap())
        .unwrap();
    conn
}

#[test]
fn reports_on_empty_schema_are_empty() {
    let conn = open_db_in_memory().unwrap();
    let reports = run_all(&conn).unwrap();

    for (title, count) in reports.summary() {
        assert_eq!(count, 0, "{title} should be empty");
    }
}

#[test]
fn employee_salaries_join_every_salary_row() {
    let conn = seeded();
    let rows = employee_salaries(&conn).unwrap();

    assert_eq!(rows.len(), sample_dataset().unwrap().salaries.len());
    let first = &rows[0];
    assert_eq!(first.emp_no, 10001);
    assert_eq!(first.last_name, "Facello");
    assert_eq!(first.gender, Gender::Male);
    assert_eq!(first.salary, 88958);
}

#[test]
fn hired_in_1986_only_returns_that_year() {
    let conn = seeded();
    let rows = employees_hired_in_1986(&conn).unwrap();

    let emp_nos: Vec<i64> = rows.iter().map(|row| row.emp_no).collect();
    assert_eq!(emp_nos, vec![12002, 10001, 10003, 10004]);
    assert!(rows.iter().all(|row| row.hire_date.year() == 1986));
}

#[test]
fn hire_year_filter_is_parameterized() {
    let conn = seeded();

    assert!(employees_hired_in(&conn, 1970).unwrap().is_empty());
    let rows = employees_hired_in(&conn, 1999).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].last_name, "Facello");
}

#[test]
fn department_managers_include_department_and_person() {
    let conn = seeded();
    let rows = department_managers(&conn).unwrap();

    let pairs: Vec<(&str, i64)> = rows
        .iter()
        .map(|row| (row.dept_no.as_str(), row.emp_no))
        .collect();
    assert_eq!(
        pairs,
        vec![("d004", 10004), ("d005", 10001), ("d007", 10002), ("d008", 10007)]
    );
    assert_eq!(rows[1].dept_name, "Development");
    assert_eq!(rows[1].first_name, "Georgi");
}

#[test]
fn employee_departments_cover_every_membership() {
    let conn = seeded();
    let rows = employee_departments(&conn).unwrap();

    assert_eq!(rows.len(), sample_dataset().unwrap().dept_employees.len());
    assert!(rows
        .iter()
        .any(|row| row.emp_no == 12004 && row.dept_name == "Finance"));
}

#[test]
fn hercules_b_matches_exact_first_name_and_prefix() {
    let conn = seeded();
    let rows = hercules_b_employees(&conn).unwrap();

    let last_names: Vec<&str> = rows.iter().map(|row| row.last_name.as_str()).collect();
    assert_eq!(last_names, vec!["Baer", "Bain", "Benzmuller"]);
    assert!(rows.iter().all(|row| row.first_name == "Hercules"));
}

#[test]
fn hercules_b_prefix_is_case_sensitive() {
    let conn = seeded();
    let repo = SqliteEmployeeRepository::new(&conn);
    repo.insert_employee(&Employee {
        emp_no: 12010,
        birth_date: date("1960-01-01"),
        first_name: "Hercules".to_string(),
        last_name: "bergstrom".to_string(),
        gender: Gender::Male,
        hire_date: date("1995-01-01"),
    })
    .unwrap();
    repo.insert_employee(&Employee {
        emp_no: 12011,
        birth_date: date("1960-01-01"),
        first_name: "hercules".to_string(),
        last_name: "Brandt".to_string(),
        gender: Gender::Female,
        hire_date: date("1995-01-01"),
    })
    .unwrap();

    let rows = hercules_b_employees(&conn).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.last_name.starts_with('B')));
}

#[test]
fn sales_lists_only_sales_members() {
    let conn = seeded();
    let rows = sales_employees(&conn).unwrap();

    let emp_nos: Vec<i64> = rows.iter().map(|row| row.emp_no).collect();
    assert_eq!(emp_nos, vec![10002, 10016, 10034, 10036, 12001, 12003]);
    assert!(rows.iter().all(|row| row.dept_name == "Sales"));
}

#[test]
fn sales_and_development_is_the_union_of_both() {
    let conn = seeded();
    let rows = sales_and_development_employees(&conn).unwrap();

    assert_eq!(rows.len(), 23);
    let names: HashSet<&str> = rows.iter().map(|row| row.dept_name.as_str()).collect();
    assert_eq!(names, HashSet::from(["Sales", "Development"]));
    assert!(employees_in_departments(&conn, &[]).unwrap().is_empty());
}

#[test]
fn last_name_frequencies_sort_by_count_descending() {
    let conn = seeded();
    let rows = last_name_frequencies(&conn).unwrap();

    assert_eq!(rows[0].last_name, "Facello");
    assert_eq!(rows[0].frequency, 3);
    assert_eq!(rows[1].last_name, "Bamford");
    assert_eq!(rows[2].last_name, "Reistad");
    assert!(rows
        .windows(2)
        .all(|pair| pair[0].frequency >= pair[1].frequency));
    let total: u64 = rows.iter().map(|row| row.frequency).sum();
    assert_eq!(total, sample_dataset().unwrap().employees.len() as u64);
}

#[test]
fn report_set_serializes_to_json() {
    let conn = seeded();
    let reports = run_all(&conn).unwrap();

    let value = serde_json::to_value(&reports).unwrap();
    assert_eq!(value["hercules_b"][0]["gender"], "M");
    assert_eq!(value["hired_in_1986"][0]["hire_date"], "1986-03-12");
    assert_eq!(value["last_name_frequencies"][0]["frequency"], 3);
    assert_eq!(value["sales"].as_array().unwrap().len(), 6);
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}
