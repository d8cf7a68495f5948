//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Reading a row back re-validates every text
//! column, so a row edited behind the application's back surfaces as a query
//! error instead of an invalid domain value.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{
    Address, AddressFields, AddressId, AddressLine, ContactLabel, Department, DepartmentId,
    DepartmentName, DepartmentSummary, Designation, EmailAddress, Employee, EmployeeId,
    EmployeePatch, Locality, NewEmployee, PersonName, PhoneNumber, PhoneNumberFields,
    PhoneNumberId, PhoneValue, PostalCode, TextError,
};

use super::schema::{departments, employee_addresses, employee_phone_numbers, employees};

/// A stored value that no longer satisfies domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column {table}.{column} holds an invalid value: {source}")]
pub(crate) struct CorruptRow {
    table: &'static str,
    column: &'static str,
    source: TextError,
}

fn column<'v, T>(
    table: &'static str,
    column: &'static str,
    parse: impl FnOnce(&'v str) -> Result<T, TextError>,
    value: &'v str,
) -> Result<T, CorruptRow> {
    parse(value).map_err(|source| CorruptRow {
        table,
        column,
        source,
    })
}

fn nullable<'v, T>(
    table: &'static str,
    name: &'static str,
    parse: impl FnOnce(&'v str) -> Result<T, TextError>,
    value: Option<&'v str>,
) -> Result<Option<T>, CorruptRow> {
    value.map(|v| column(table, name, parse, v)).transpose()
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

/// Row struct for reading from the departments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DepartmentRow {
    pub(crate) fn into_domain(self) -> Result<Department, CorruptRow> {
        Ok(Department {
            id: DepartmentId::new(self.id),
            name: column("departments", "name", DepartmentName::new, &self.name)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    pub(crate) fn summary(self) -> Result<DepartmentSummary, CorruptRow> {
        self.into_domain().map(|department| DepartmentSummary::from(&department))
    }
}

/// Insertable struct for creating departments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = departments)]
pub(crate) struct NewDepartmentRow<'a> {
    pub name: &'a str,
}

/// Changeset struct for renaming departments.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = departments)]
pub(crate) struct DepartmentUpdate<'a> {
    pub name: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

/// Row struct for reading from the employees table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub designation: Option<String>,
    pub department_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeRow {
    pub(crate) fn into_domain(self) -> Result<Employee, CorruptRow> {
        const TABLE: &str = "employees";
        Ok(Employee {
            id: EmployeeId::new(self.id),
            first_name: column(TABLE, "first_name", PersonName::new, &self.first_name)?,
            last_name: nullable(TABLE, "last_name", PersonName::new, self.last_name.as_deref())?,
            email: nullable(TABLE, "email", EmailAddress::new, self.email.as_deref())?,
            date_of_birth: self.date_of_birth,
            designation: nullable(
                TABLE,
                "designation",
                Designation::new,
                self.designation.as_deref(),
            )?,
            department_id: DepartmentId::new(self.department_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating employees.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employees)]
pub(crate) struct NewEmployeeRow<'a> {
    pub first_name: &'a str,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub designation: Option<&'a str>,
    pub department_id: i64,
}

impl<'a> From<&'a NewEmployee> for NewEmployeeRow<'a> {
    fn from(employee: &'a NewEmployee) -> Self {
        Self {
            first_name: employee.first_name.as_str(),
            last_name: employee.last_name.as_ref().map(PersonName::as_str),
            email: employee.email.as_ref().map(EmailAddress::as_str),
            date_of_birth: employee.date_of_birth,
            designation: employee.designation.as_ref().map(Designation::as_str),
            department_id: employee.department_id.get(),
        }
    }
}

/// Changeset applying an [`EmployeePatch`].
///
/// An outer `None` leaves the column alone; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = employees)]
pub(crate) struct EmployeeUpdate<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<Option<&'a str>>,
    pub email: Option<Option<&'a str>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub designation: Option<Option<&'a str>>,
    pub department_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> EmployeeUpdate<'a> {
    pub(crate) fn new(patch: &'a EmployeePatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            first_name: patch.first_name.as_ref().map(PersonName::as_str),
            last_name: patch
                .last_name
                .as_ref()
                .map(|v| v.as_ref().map(PersonName::as_str)),
            email: patch
                .email
                .as_ref()
                .map(|v| v.as_ref().map(EmailAddress::as_str)),
            date_of_birth: patch.date_of_birth,
            designation: patch
                .designation
                .as_ref()
                .map(|v| v.as_ref().map(Designation::as_str)),
            department_id: patch.department_id.map(DepartmentId::get),
            updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Phone numbers
// ---------------------------------------------------------------------------

/// Row struct for reading from the employee_phone_numbers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employee_phone_numbers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PhoneNumberRow {
    pub id: i64,
    pub employee_id: i64,
    pub phone: String,
    pub label: Option<String>,
    pub is_primary: bool,
}

impl PhoneNumberRow {
    pub(crate) fn into_domain(self) -> Result<PhoneNumber, CorruptRow> {
        const TABLE: &str = "employee_phone_numbers";
        Ok(PhoneNumber {
            id: PhoneNumberId::new(self.id),
            employee_id: EmployeeId::new(self.employee_id),
            fields: PhoneNumberFields {
                phone: column(TABLE, "phone", PhoneValue::new, &self.phone)?,
                label: nullable(TABLE, "label", ContactLabel::new, self.label.as_deref())?,
                is_primary: self.is_primary,
            },
        })
    }
}

/// Insertable struct for creating phone numbers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employee_phone_numbers)]
pub(crate) struct NewPhoneNumberRow<'a> {
    pub employee_id: i64,
    pub phone: &'a str,
    pub label: Option<&'a str>,
    pub is_primary: bool,
}

impl<'a> NewPhoneNumberRow<'a> {
    pub(crate) fn new(employee_id: EmployeeId, fields: &'a PhoneNumberFields) -> Self {
        Self {
            employee_id: employee_id.get(),
            phone: fields.phone.as_str(),
            label: fields.label.as_ref().map(ContactLabel::as_str),
            is_primary: fields.is_primary,
        }
    }
}

/// Changeset overwriting every mapped phone number column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = employee_phone_numbers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PhoneNumberUpdate<'a> {
    pub phone: &'a str,
    pub label: Option<&'a str>,
    pub is_primary: bool,
    pub updated_at: DateTime<Utc>,
}

impl<'a> PhoneNumberUpdate<'a> {
    pub(crate) fn new(fields: &'a PhoneNumberFields, updated_at: DateTime<Utc>) -> Self {
        Self {
            phone: fields.phone.as_str(),
            label: fields.label.as_ref().map(ContactLabel::as_str),
            is_primary: fields.is_primary,
            updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Row struct for reading from the employee_addresses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employee_addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AddressRow {
    pub id: i64,
    pub employee_id: i64,
    pub line1: String,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub label: Option<String>,
    pub is_primary: bool,
}

impl AddressRow {
    pub(crate) fn into_domain(self) -> Result<Address, CorruptRow> {
        const TABLE: &str = "employee_addresses";
        Ok(Address {
            id: AddressId::new(self.id),
            employee_id: EmployeeId::new(self.employee_id),
            fields: AddressFields {
                line1: column(TABLE, "line1", AddressLine::new, &self.line1)?,
                line2: nullable(TABLE, "line2", AddressLine::new, self.line2.as_deref())?,
                city: nullable(TABLE, "city", Locality::new, self.city.as_deref())?,
                state: nullable(TABLE, "state", Locality::new, self.state.as_deref())?,
                country: nullable(TABLE, "country", Locality::new, self.country.as_deref())?,
                postal_code: nullable(
                    TABLE,
                    "postal_code",
                    PostalCode::new,
                    self.postal_code.as_deref(),
                )?,
                label: nullable(TABLE, "label", ContactLabel::new, self.label.as_deref())?,
                is_primary: self.is_primary,
            },
        })
    }
}

/// Insertable struct for creating addresses.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employee_addresses)]
pub(crate) struct NewAddressRow<'a> {
    pub employee_id: i64,
    pub line1: &'a str,
    pub line2: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub country: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub label: Option<&'a str>,
    pub is_primary: bool,
}

impl<'a> NewAddressRow<'a> {
    pub(crate) fn new(employee_id: EmployeeId, fields: &'a AddressFields) -> Self {
        Self {
            employee_id: employee_id.get(),
            line1: fields.line1.as_str(),
            line2: fields.line2.as_ref().map(AddressLine::as_str),
            city: fields.city.as_ref().map(Locality::as_str),
            state: fields.state.as_ref().map(Locality::as_str),
            country: fields.country.as_ref().map(Locality::as_str),
            postal_code: fields.postal_code.as_ref().map(PostalCode::as_str),
            label: fields.label.as_ref().map(ContactLabel::as_str),
            is_primary: fields.is_primary,
        }
    }
}

/// Changeset overwriting every mapped address column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = employee_addresses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AddressUpdate<'a> {
    pub line1: &'a str,
    pub line2: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub country: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub label: Option<&'a str>,
    pub is_primary: bool,
    pub updated_at: DateTime<Utc>,
}

impl<'a> AddressUpdate<'a> {
    pub(crate) fn new(fields: &'a AddressFields, updated_at: DateTime<Utc>) -> Self {
        Self {
            line1: fields.line1.as_str(),
            line2: fields.line2.as_ref().map(AddressLine::as_str),
            city: fields.city.as_ref().map(Locality::as_str),
            state: fields.state.as_ref().map(Locality::as_str),
            country: fields.country.as_ref().map(Locality::as_str),
            postal_code: fields.postal_code.as_ref().map(PostalCode::as_str),
            label: fields.label.as_ref().map(ContactLabel::as_str),
            is_primary: fields.is_primary,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn employee_row() -> EmployeeRow {
        EmployeeRow {
            id: 7,
            first_name: "Ada".to_owned(),
            last_name: Some("Lovelace".to_owned()),
            email: None,
            date_of_birth: None,
            designation: None,
            department_id: 2,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[rstest]
    fn employee_row_maps_to_domain() {
        let employee = employee_row().into_domain().expect("valid row");
        assert_eq!(employee.id, EmployeeId::new(7));
        assert_eq!(employee.department_id, DepartmentId::new(2));
        assert_eq!(
            employee.last_name.as_ref().map(PersonName::as_str),
            Some("Lovelace")
        );
    }

    #[rstest]
    fn corrupt_email_is_reported_with_its_column() {
        let row = EmployeeRow {
            email: Some("not-an-email".to_owned()),
            ..employee_row()
        };
        let error = row.into_domain().expect_err("corrupt row");
        assert_eq!(
            error.to_string(),
            "column employees.email holds an invalid value: is not well formed"
        );
    }

    #[rstest]
    fn patch_changeset_distinguishes_absent_from_cleared() {
        let patch = EmployeePatch {
            last_name: Some(None),
            ..EmployeePatch::default()
        };
        let update = EmployeeUpdate::new(&patch, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(update.last_name, Some(None));
        assert_eq!(update.email, None);
        assert_eq!(update.first_name, None);
    }
}
