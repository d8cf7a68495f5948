//! Diesel table definitions for the PostgreSQL schema.
//!
//! The schema is owned by the database administrators; these definitions
//! must match it exactly. Regenerate them with `diesel print-schema` after a
//! schema change. `employees.email` carries the unique constraint
//! `employees_email_key`, and both child tables cascade on employee delete.

diesel::table! {
    /// Organisational units owning employees.
    departments (id) {
        /// Primary key.
        id -> Int8,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Employee scalar fields. `email` carries a unique index.
    employees (id) {
        id -> Int8,
        first_name -> Varchar,
        last_name -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        date_of_birth -> Nullable<Date>,
        designation -> Nullable<Varchar>,
        /// References `departments.id`; deletes are restricted.
        department_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Phone numbers owned by an employee; cascade-deleted with it.
    employee_phone_numbers (id) {
        id -> Int8,
        employee_id -> Int8,
        phone -> Varchar,
        label -> Nullable<Varchar>,
        is_primary -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Addresses owned by an employee; cascade-deleted with it.
    employee_addresses (id) {
        id -> Int8,
        employee_id -> Int8,
        line1 -> Varchar,
        line2 -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        state -> Nullable<Varchar>,
        country -> Nullable<Varchar>,
        postal_code -> Nullable<Varchar>,
        label -> Nullable<Varchar>,
        is_primary -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(employees -> departments (department_id));
diesel::joinable!(employee_phone_numbers -> employees (employee_id));
diesel::joinable!(employee_addresses -> employees (employee_id));

diesel::allow_tables_to_appear_in_same_query!(
    departments,
    employees,
    employee_phone_numbers,
    employee_addresses,
);
