//! Employee aggregate reconciliation.
//!
//! Brings an employee's phone numbers and addresses to a submitted target
//! state: submissions naming one of the employee's children overwrite it,
//! every other submission creates a new child, and children left out of the
//! submission are deleted. Each collection is handled independently and only
//! when it was submitted; an empty submission deletes every child of that
//! kind.
//!
//! The functions here run against an [`EmployeeUnitOfWork`] and never open or
//! commit transactions themselves. Adapters call them inside one transaction
//! and commit only on `Ok`, so a failure at any step leaves no partial write.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::{debug, info};

use super::ports::{EmployeeRepositoryError, EmployeeUnitOfWork, EmployeeWriteError};
use super::{
    AddressSubmission, ChildSubmission, DepartmentId, EmployeeAggregate, EmployeeId,
    EmployeeReconciliation, NewEmployeeAggregate, PhoneNumberSubmission,
};

/// Write planned for one submitted child.
#[derive(Debug, PartialEq, Eq)]
enum ChildAction<'a, Id, F> {
    Overwrite { id: Id, fields: &'a F },
    Create { fields: &'a F },
}

/// Decide, per submission, whether it overwrites a persisted child or
/// creates a new one.
///
/// Only ids in `persisted` are overwritten. An id belonging to another
/// employee, or to nothing at all, is treated like a missing id.
fn plan_children<'a, Id, F>(
    persisted: &[Id],
    submissions: &'a [ChildSubmission<Id, F>],
) -> Vec<ChildAction<'a, Id, F>>
where
    Id: Copy + Eq + Hash,
{
    let owned: HashSet<Id> = persisted.iter().copied().collect();
    submissions
        .iter()
        .map(|submission| match submission.id {
            Some(id) if owned.contains(&id) => ChildAction::Overwrite {
                id,
                fields: &submission.fields,
            },
            _ => ChildAction::Create {
                fields: &submission.fields,
            },
        })
        .collect()
}

/// Row counts for one reconciled collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ChildSyncSummary {
    updated: usize,
    created: usize,
    deleted: usize,
}

async fn sync_phone_numbers<U>(
    uow: &mut U,
    employee_id: EmployeeId,
    submissions: &[PhoneNumberSubmission],
) -> Result<ChildSyncSummary, EmployeeRepositoryError>
where
    U: EmployeeUnitOfWork + ?Sized,
{
    let persisted = uow.phone_number_ids(employee_id).await?;
    let mut kept = Vec::with_capacity(submissions.len());
    let mut summary = ChildSyncSummary::default();

    for action in plan_children(&persisted, submissions) {
        match action {
            ChildAction::Overwrite { id, fields } => {
                uow.update_phone_number(employee_id, id, fields).await?;
                summary.updated += 1;
                kept.push(id);
            }
            ChildAction::Create { fields } => {
                kept.push(uow.insert_phone_number(employee_id, fields).await?);
                summary.created += 1;
            }
        }
    }

    summary.deleted = uow.delete_phone_numbers_except(employee_id, &kept).await?;
    debug!(%employee_id, ?summary, "phone numbers reconciled");
    Ok(summary)
}

async fn sync_addresses<U>(
    uow: &mut U,
    employee_id: EmployeeId,
    submissions: &[AddressSubmission],
) -> Result<ChildSyncSummary, EmployeeRepositoryError>
where
    U: EmployeeUnitOfWork + ?Sized,
{
    let persisted = uow.address_ids(employee_id).await?;
    let mut kept = Vec::with_capacity(submissions.len());
    let mut summary = ChildSyncSummary::default();

    for action in plan_children(&persisted, submissions) {
        match action {
            ChildAction::Overwrite { id, fields } => {
                uow.update_address(employee_id, id, fields).await?;
                summary.updated += 1;
                kept.push(id);
            }
            ChildAction::Create { fields } => {
                kept.push(uow.insert_address(employee_id, fields).await?);
                summary.created += 1;
            }
        }
    }

    summary.deleted = uow.delete_addresses_except(employee_id, &kept).await?;
    debug!(%employee_id, ?summary, "addresses reconciled");
    Ok(summary)
}

async fn ensure_department<U>(
    uow: &mut U,
    department_id: DepartmentId,
) -> Result<(), EmployeeWriteError>
where
    U: EmployeeUnitOfWork + ?Sized,
{
    if uow.department_exists(department_id).await? {
        Ok(())
    } else {
        Err(EmployeeWriteError::DepartmentNotFound(department_id))
    }
}

async fn reload<U>(
    uow: &mut U,
    employee_id: EmployeeId,
) -> Result<EmployeeAggregate, EmployeeWriteError>
where
    U: EmployeeUnitOfWork + ?Sized,
{
    uow.load_aggregate(employee_id).await?.ok_or_else(|| {
        EmployeeRepositoryError::query(format!("employee {employee_id} vanished mid-transaction"))
            .into()
    })
}

/// Reconcile an existing employee inside the caller's transaction.
///
/// Locks the employee, applies the scalar patch, then synchronises each
/// submitted child collection and reloads the aggregate.
///
/// # Errors
///
/// [`EmployeeWriteError::EmployeeNotFound`] before any write when the
/// employee does not exist, [`EmployeeWriteError::DepartmentNotFound`] when
/// the patch moves the employee to an unknown department, and
/// [`EmployeeWriteError::Storage`] when the unit of work fails. The caller
/// must roll back on any error.
pub async fn reconcile_employee<U>(
    uow: &mut U,
    request: &EmployeeReconciliation,
) -> Result<EmployeeAggregate, EmployeeWriteError>
where
    U: EmployeeUnitOfWork + ?Sized,
{
    let employee_id = request.employee_id;
    if uow.lock_employee(employee_id).await?.is_none() {
        return Err(EmployeeWriteError::EmployeeNotFound(employee_id));
    }

    if !request.patch.is_empty() {
        if let Some(department_id) = request.patch.department_id {
            ensure_department(uow, department_id).await?;
        }
        uow.update_employee(employee_id, &request.patch).await?;
    }

    let phone_numbers = match &request.phone_numbers {
        Some(submissions) => Some(sync_phone_numbers(uow, employee_id, submissions).await?),
        None => None,
    };
    let addresses = match &request.addresses {
        Some(submissions) => Some(sync_addresses(uow, employee_id, submissions).await?),
        None => None,
    };

    let aggregate = reload(uow, employee_id).await?;
    info!(
        %employee_id,
        ?phone_numbers,
        ?addresses,
        "employee reconciled"
    );
    Ok(aggregate)
}

/// Create an employee and its children inside the caller's transaction.
///
/// # Errors
///
/// [`EmployeeWriteError::DepartmentNotFound`] before any write when the
/// department does not exist, [`EmployeeWriteError::Storage`] when the unit
/// of work fails.
pub async fn create_employee<U>(
    uow: &mut U,
    aggregate: &NewEmployeeAggregate,
) -> Result<EmployeeAggregate, EmployeeWriteError>
where
    U: EmployeeUnitOfWork + ?Sized,
{
    ensure_department(uow, aggregate.employee.department_id).await?;
    let employee_id = uow.insert_employee(&aggregate.employee).await?;
    for fields in &aggregate.phone_numbers {
        uow.insert_phone_number(employee_id, fields).await?;
    }
    for fields in &aggregate.addresses {
        uow.insert_address(employee_id, fields).await?;
    }

    let created = reload(uow, employee_id).await?;
    info!(
        %employee_id,
        phone_numbers = created.phone_numbers.len(),
        addresses = created.addresses.len(),
        "employee created"
    );
    Ok(created)
}

#[cfg(test)]
mod tests;
