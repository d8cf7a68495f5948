//! PostgreSQL-backed employee repository.
//!
//! Aggregate writes run the domain reconciler against a
//! [`DieselUnitOfWork`] bound to one transaction. The employee row is locked
//! with `SELECT ... FOR UPDATE` first, so concurrent updates of the same
//! employee apply one after the other.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    EmployeeRepository, EmployeeRepositoryError, EmployeeUnitOfWork, EmployeeWriteError,
};
use crate::domain::{
    Address, AddressFields, AddressId, DepartmentId, DepartmentSummary, EmailAddress, Employee,
    EmployeeAggregate, EmployeeId, EmployeePatch, EmployeeReconciliation, NewEmployee,
    NewEmployeeAggregate, PhoneNumber, PhoneNumberFields, PhoneNumberId, create_employee,
    reconcile_employee,
};

use super::diesel_helpers::{map_corrupt_row, map_employee_diesel_error, map_employee_pool_error};
use super::models::{
    AddressRow, AddressUpdate, DepartmentRow, EmployeeRow, EmployeeUpdate, NewAddressRow,
    NewEmployeeRow, NewPhoneNumberRow, PhoneNumberRow, PhoneNumberUpdate,
};
use super::pool::DbPool;
use super::schema::{departments, employee_addresses, employee_phone_numbers, employees};

fn query_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> EmployeeRepositoryError {
    move |error| map_employee_diesel_error(error, operation, None)
}

/// Load departments and children for `rows`, preserving their order.
async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<EmployeeRow>,
) -> Result<Vec<EmployeeAggregate>, EmployeeRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let employee_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let department_ids: Vec<i64> = rows.iter().map(|row| row.department_id).collect();

    let summaries: HashMap<i64, DepartmentSummary> = departments::table
        .filter(departments::id.eq_any(&department_ids))
        .select(DepartmentRow::as_select())
        .load(conn)
        .await
        .map_err(query_error("load departments"))?
        .into_iter()
        .map(|row| {
            let id = row.id;
            row.summary().map(|summary| (id, summary))
        })
        .collect::<Result<_, _>>()
        .map_err(map_corrupt_row)?;

    let mut phone_numbers: HashMap<i64, Vec<PhoneNumber>> = HashMap::new();
    let phone_rows: Vec<PhoneNumberRow> = employee_phone_numbers::table
        .filter(employee_phone_numbers::employee_id.eq_any(&employee_ids))
        .order_by(employee_phone_numbers::id)
        .select(PhoneNumberRow::as_select())
        .load(conn)
        .await
        .map_err(query_error("load phone numbers"))?;
    for row in phone_rows {
        let phone = row.into_domain().map_err(map_corrupt_row)?;
        phone_numbers
            .entry(phone.employee_id.get())
            .or_default()
            .push(phone);
    }

    let mut addresses: HashMap<i64, Vec<Address>> = HashMap::new();
    let address_rows: Vec<AddressRow> = employee_addresses::table
        .filter(employee_addresses::employee_id.eq_any(&employee_ids))
        .order_by(employee_addresses::id)
        .select(AddressRow::as_select())
        .load(conn)
        .await
        .map_err(query_error("load addresses"))?;
    for row in address_rows {
        let address = row.into_domain().map_err(map_corrupt_row)?;
        addresses
            .entry(address.employee_id.get())
            .or_default()
            .push(address);
    }

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let department = summaries.get(&row.department_id).cloned().ok_or_else(|| {
                EmployeeRepositoryError::query(format!(
                    "employee {id} references missing department {}",
                    row.department_id
                ))
            })?;
            Ok(EmployeeAggregate {
                employee: row.into_domain().map_err(map_corrupt_row)?,
                department,
                phone_numbers: phone_numbers.remove(&id).unwrap_or_default(),
                addresses: addresses.remove(&id).unwrap_or_default(),
            })
        })
        .collect()
}

/// Unit of work over a connection with an open transaction.
struct DieselUnitOfWork<'c> {
    conn: &'c mut AsyncPgConnection,
}

fn not_owned(
    kind: &str,
    id: impl std::fmt::Display,
    employee_id: EmployeeId,
) -> EmployeeRepositoryError {
    EmployeeRepositoryError::query(format!("{kind} {id} is not owned by employee {employee_id}"))
}

fn raw_ids<Id: Copy>(ids: &[Id], get: fn(Id) -> i64) -> Vec<i64> {
    ids.iter().copied().map(get).collect()
}

#[async_trait]
impl EmployeeUnitOfWork for DieselUnitOfWork<'_> {
    async fn lock_employee(
        &mut self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let row: Option<EmployeeRow> = employees::table
            .find(id.get())
            .select(EmployeeRow::as_select())
            .for_update()
            .get_result(self.conn)
            .await
            .optional()
            .map_err(query_error("lock employee"))?;
        row.map(EmployeeRow::into_domain)
            .transpose()
            .map_err(map_corrupt_row)
    }

    async fn department_exists(
        &mut self,
        id: DepartmentId,
    ) -> Result<bool, EmployeeRepositoryError> {
        diesel::select(diesel::dsl::exists(departments::table.find(id.get())))
            .get_result(self.conn)
            .await
            .map_err(query_error("check department"))
    }

    async fn insert_employee(
        &mut self,
        employee: &NewEmployee,
    ) -> Result<EmployeeId, EmployeeRepositoryError> {
        diesel::insert_into(employees::table)
            .values(NewEmployeeRow::from(employee))
            .returning(employees::id)
            .get_result(self.conn)
            .await
            .map(EmployeeId::new)
            .map_err(|error| {
                map_employee_diesel_error(
                    error,
                    "insert employee",
                    employee.email.as_ref().map(EmailAddress::as_str),
                )
            })
    }

    async fn update_employee(
        &mut self,
        id: EmployeeId,
        patch: &EmployeePatch,
    ) -> Result<(), EmployeeRepositoryError> {
        diesel::update(employees::table.find(id.get()))
            .set(EmployeeUpdate::new(patch, Utc::now()))
            .execute(self.conn)
            .await
            .map(|_| ())
            .map_err(|error| {
                let email = patch.email.as_ref().and_then(Option::as_ref);
                map_employee_diesel_error(
                    error,
                    "update employee",
                    email.map(EmailAddress::as_str),
                )
            })
    }

    async fn phone_number_ids(
        &mut self,
        employee_id: EmployeeId,
    ) -> Result<Vec<PhoneNumberId>, EmployeeRepositoryError> {
        let ids: Vec<i64> = employee_phone_numbers::table
            .filter(employee_phone_numbers::employee_id.eq(employee_id.get()))
            .order_by(employee_phone_numbers::id)
            .select(employee_phone_numbers::id)
            .load(self.conn)
            .await
            .map_err(query_error("list phone numbers"))?;
        Ok(ids.into_iter().map(PhoneNumberId::new).collect())
    }

    async fn update_phone_number(
        &mut self,
        employee_id: EmployeeId,
        id: PhoneNumberId,
        fields: &PhoneNumberFields,
    ) -> Result<(), EmployeeRepositoryError> {
        let updated = diesel::update(
            employee_phone_numbers::table
                .filter(employee_phone_numbers::id.eq(id.get()))
                .filter(employee_phone_numbers::employee_id.eq(employee_id.get())),
        )
        .set(PhoneNumberUpdate::new(fields, Utc::now()))
        .execute(self.conn)
        .await
        .map_err(query_error("update phone number"))?;
        if updated == 0 {
            return Err(not_owned("phone number", id, employee_id));
        }
        Ok(())
    }

    async fn insert_phone_number(
        &mut self,
        employee_id: EmployeeId,
        fields: &PhoneNumberFields,
    ) -> Result<PhoneNumberId, EmployeeRepositoryError> {
        diesel::insert_into(employee_phone_numbers::table)
            .values(NewPhoneNumberRow::new(employee_id, fields))
            .returning(employee_phone_numbers::id)
            .get_result(self.conn)
            .await
            .map(PhoneNumberId::new)
            .map_err(query_error("insert phone number"))
    }

    async fn delete_phone_numbers_except(
        &mut self,
        employee_id: EmployeeId,
        keep: &[PhoneNumberId],
    ) -> Result<usize, EmployeeRepositoryError> {
        diesel::delete(
            employee_phone_numbers::table
                .filter(employee_phone_numbers::employee_id.eq(employee_id.get()))
                .filter(employee_phone_numbers::id.ne_all(raw_ids(keep, PhoneNumberId::get))),
        )
        .execute(self.conn)
        .await
        .map_err(query_error("delete phone numbers"))
    }

    async fn address_ids(
        &mut self,
        employee_id: EmployeeId,
    ) -> Result<Vec<AddressId>, EmployeeRepositoryError> {
        let ids: Vec<i64> = employee_addresses::table
            .filter(employee_addresses::employee_id.eq(employee_id.get()))
            .order_by(employee_addresses::id)
            .select(employee_addresses::id)
            .load(self.conn)
            .await
            .map_err(query_error("list addresses"))?;
        Ok(ids.into_iter().map(AddressId::new).collect())
    }

    async fn update_address(
        &mut self,
        employee_id: EmployeeId,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<(), EmployeeRepositoryError> {
        let updated = diesel::update(
            employee_addresses::table
                .filter(employee_addresses::id.eq(id.get()))
                .filter(employee_addresses::employee_id.eq(employee_id.get())),
        )
        .set(AddressUpdate::new(fields, Utc::now()))
        .execute(self.conn)
        .await
        .map_err(query_error("update address"))?;
        if updated == 0 {
            return Err(not_owned("address", id, employee_id));
        }
        Ok(())
    }

    async fn insert_address(
        &mut self,
        employee_id: EmployeeId,
        fields: &AddressFields,
    ) -> Result<AddressId, EmployeeRepositoryError> {
        diesel::insert_into(employee_addresses::table)
            .values(NewAddressRow::new(employee_id, fields))
            .returning(employee_addresses::id)
            .get_result(self.conn)
            .await
            .map(AddressId::new)
            .map_err(query_error("insert address"))
    }

    async fn delete_addresses_except(
        &mut self,
        employee_id: EmployeeId,
        keep: &[AddressId],
    ) -> Result<usize, EmployeeRepositoryError> {
        diesel::delete(
            employee_addresses::table
                .filter(employee_addresses::employee_id.eq(employee_id.get()))
                .filter(employee_addresses::id.ne_all(raw_ids(keep, AddressId::get))),
        )
        .execute(self.conn)
        .await
        .map_err(query_error("delete addresses"))
    }

    async fn load_aggregate(
        &mut self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeAggregate>, EmployeeRepositoryError> {
        let row: Option<EmployeeRow> = employees::table
            .find(id.get())
            .select(EmployeeRow::as_select())
            .first(self.conn)
            .await
            .optional()
            .map_err(query_error("load employee"))?;
        match row {
            Some(row) => Ok(assemble(self.conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// Error type threaded through Diesel's transaction closure.
///
/// Diesel needs `From<diesel::result::Error>` to report begin and commit
/// failures; domain failures ride along unchanged.
#[derive(Debug)]
enum TxError {
    Write(EmployeeWriteError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<EmployeeWriteError> for TxError {
    fn from(error: EmployeeWriteError) -> Self {
        Self::Write(error)
    }
}

impl From<TxError> for EmployeeWriteError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Write(error) => error,
            TxError::Diesel(error) => {
                map_employee_diesel_error(error, "employee transaction", None).into()
            }
        }
    }
}

/// Diesel-backed implementation of [`EmployeeRepository`].
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/personnel")).await?;
    /// let repo = DieselEmployeeRepository::new(pool);
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn create(
        &self,
        aggregate: &NewEmployeeAggregate,
    ) -> Result<EmployeeAggregate, EmployeeWriteError> {
        let mut pooled = self.pool.get().await.map_err(map_employee_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let created = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut uow = DieselUnitOfWork { conn };
                    Ok(create_employee(&mut uow, aggregate).await?)
                }
                .scope_boxed()
            })
            .await?;
        Ok(created)
    }

    async fn reconcile(
        &self,
        request: &EmployeeReconciliation,
    ) -> Result<EmployeeAggregate, EmployeeWriteError> {
        let mut pooled = self.pool.get().await.map_err(map_employee_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let reconciled = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut uow = DieselUnitOfWork { conn };
                    Ok(reconcile_employee(&mut uow, request).await?)
                }
                .scope_boxed()
            })
            .await?;
        Ok(reconciled)
    }

    async fn find(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeAggregate>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_employee_pool_error)?;
        let mut uow = DieselUnitOfWork { conn: &mut conn };
        uow.load_aggregate(id).await
    }

    async fn list(&self) -> Result<Vec<EmployeeAggregate>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_employee_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .order_by(employees::id)
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error("list employees"))?;
        assemble(&mut conn, rows).await
    }

    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_employee_pool_error)?;
        let deleted = diesel::delete(employees::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(query_error("delete employee"))?;
        Ok(deleted > 0)
    }
}
