//! In-process personnel store.
//!
//! Serves both repository ports from tables held behind one async mutex. A
//! write runs against a copy of the tables and replaces the originals only
//! when the whole operation succeeds, which gives the same all-or-nothing
//! behaviour as a database transaction. Used when no database URL is
//! configured, and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{
    DepartmentRepository, DepartmentRepositoryError, EmployeeRepository, EmployeeRepositoryError,
    EmployeeUnitOfWork, EmployeeWriteError,
};
use crate::domain::{
    Address, AddressFields, AddressId, Department, DepartmentId, DepartmentName,
    DepartmentSummary, EmailAddress, Employee, EmployeeAggregate, EmployeeId, EmployeePatch,
    EmployeeReconciliation, NewEmployee, NewEmployeeAggregate, PhoneNumber, PhoneNumberFields,
    PhoneNumberId, create_employee, reconcile_employee,
};

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    departments: BTreeMap<DepartmentId, Department>,
    employees: BTreeMap<EmployeeId, Employee>,
    phone_numbers: BTreeMap<PhoneNumberId, PhoneNumber>,
    addresses: BTreeMap<AddressId, Address>,
    last_department_id: i64,
    last_employee_id: i64,
    last_phone_number_id: i64,
    last_address_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl Tables {
    fn aggregate(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeAggregate>, EmployeeRepositoryError> {
        let Some(employee) = self.employees.get(&id) else {
            return Ok(None);
        };
        let department = self
            .departments
            .get(&employee.department_id)
            .map(DepartmentSummary::from)
            .ok_or_else(|| {
                EmployeeRepositoryError::query(format!(
                    "employee {id} references missing department {}",
                    employee.department_id
                ))
            })?;
        Ok(Some(EmployeeAggregate {
            employee: employee.clone(),
            department,
            phone_numbers: self
                .phone_numbers
                .values()
                .filter(|phone| phone.employee_id == id)
                .cloned()
                .collect(),
            addresses: self
                .addresses
                .values()
                .filter(|address| address.employee_id == id)
                .cloned()
                .collect(),
        }))
    }

    fn ensure_email_free(
        &self,
        email: Option<&EmailAddress>,
        owner: Option<EmployeeId>,
    ) -> Result<(), EmployeeRepositoryError> {
        let Some(email) = email else {
            return Ok(());
        };
        let taken = self
            .employees
            .values()
            .any(|other| Some(other.id) != owner && other.email.as_ref() == Some(email));
        if taken {
            Err(EmployeeRepositoryError::duplicate_email(email.as_str()))
        } else {
            Ok(())
        }
    }
}

/// Unit of work over a working copy of the tables.
pub(crate) struct MemoryUnitOfWork<'t> {
    tables: &'t mut Tables,
}

impl<'t> MemoryUnitOfWork<'t> {
    pub(crate) fn new(tables: &'t mut Tables) -> Self {
        Self { tables }
    }
}

fn not_owned(
    kind: &str,
    id: impl std::fmt::Display,
    employee_id: EmployeeId,
) -> EmployeeRepositoryError {
    EmployeeRepositoryError::query(format!("{kind} {id} is not owned by employee {employee_id}"))
}

#[async_trait]
impl EmployeeUnitOfWork for MemoryUnitOfWork<'_> {
    async fn lock_employee(
        &mut self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self.tables.employees.get(&id).cloned())
    }

    async fn department_exists(
        &mut self,
        id: DepartmentId,
    ) -> Result<bool, EmployeeRepositoryError> {
        Ok(self.tables.departments.contains_key(&id))
    }

    async fn insert_employee(
        &mut self,
        employee: &NewEmployee,
    ) -> Result<EmployeeId, EmployeeRepositoryError> {
        self.tables.ensure_email_free(employee.email.as_ref(), None)?;
        let id = EmployeeId::new(next_id(&mut self.tables.last_employee_id));
        let now = Utc::now();
        self.tables.employees.insert(
            id,
            Employee {
                id,
                first_name: employee.first_name.clone(),
                last_name: employee.last_name.clone(),
                email: employee.email.clone(),
                date_of_birth: employee.date_of_birth,
                designation: employee.designation.clone(),
                department_id: employee.department_id,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update_employee(
        &mut self,
        id: EmployeeId,
        patch: &EmployeePatch,
    ) -> Result<(), EmployeeRepositoryError> {
        if let Some(email) = &patch.email {
            self.tables.ensure_email_free(email.as_ref(), Some(id))?;
        }
        let employee = self
            .tables
            .employees
            .get_mut(&id)
            .ok_or_else(|| EmployeeRepositoryError::query(format!("employee {id} not found")))?;
        patch.apply(employee);
        employee.updated_at = Utc::now();
        Ok(())
    }

    async fn phone_number_ids(
        &mut self,
        employee_id: EmployeeId,
    ) -> Result<Vec<PhoneNumberId>, EmployeeRepositoryError> {
        Ok(self
            .tables
            .phone_numbers
            .values()
            .filter(|phone| phone.employee_id == employee_id)
            .map(|phone| phone.id)
            .collect())
    }

    async fn update_phone_number(
        &mut self,
        employee_id: EmployeeId,
        id: PhoneNumberId,
        fields: &PhoneNumberFields,
    ) -> Result<(), EmployeeRepositoryError> {
        match self.tables.phone_numbers.get_mut(&id) {
            Some(phone) if phone.employee_id == employee_id => {
                phone.fields = fields.clone();
                Ok(())
            }
            _ => Err(not_owned("phone number", id, employee_id)),
        }
    }

    async fn insert_phone_number(
        &mut self,
        employee_id: EmployeeId,
        fields: &PhoneNumberFields,
    ) -> Result<PhoneNumberId, EmployeeRepositoryError> {
        let id = PhoneNumberId::new(next_id(&mut self.tables.last_phone_number_id));
        self.tables.phone_numbers.insert(
            id,
            PhoneNumber {
                id,
                employee_id,
                fields: fields.clone(),
            },
        );
        Ok(id)
    }

    async fn delete_phone_numbers_except(
        &mut self,
        employee_id: EmployeeId,
        keep: &[PhoneNumberId],
    ) -> Result<usize, EmployeeRepositoryError> {
        let before = self.tables.phone_numbers.len();
        self.tables
            .phone_numbers
            .retain(|id, phone| phone.employee_id != employee_id || keep.contains(id));
        Ok(before - self.tables.phone_numbers.len())
    }

    async fn address_ids(
        &mut self,
        employee_id: EmployeeId,
    ) -> Result<Vec<AddressId>, EmployeeRepositoryError> {
        Ok(self
            .tables
            .addresses
            .values()
            .filter(|address| address.employee_id == employee_id)
            .map(|address| address.id)
            .collect())
    }

    async fn update_address(
        &mut self,
        employee_id: EmployeeId,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<(), EmployeeRepositoryError> {
        match self.tables.addresses.get_mut(&id) {
            Some(address) if address.employee_id == employee_id => {
                address.fields = fields.clone();
                Ok(())
            }
            _ => Err(not_owned("address", id, employee_id)),
        }
    }

    async fn insert_address(
        &mut self,
        employee_id: EmployeeId,
        fields: &AddressFields,
    ) -> Result<AddressId, EmployeeRepositoryError> {
        let id = AddressId::new(next_id(&mut self.tables.last_address_id));
        self.tables.addresses.insert(
            id,
            Address {
                id,
                employee_id,
                fields: fields.clone(),
            },
        );
        Ok(id)
    }

    async fn delete_addresses_except(
        &mut self,
        employee_id: EmployeeId,
        keep: &[AddressId],
    ) -> Result<usize, EmployeeRepositoryError> {
        let before = self.tables.addresses.len();
        self.tables
            .addresses
            .retain(|id, address| address.employee_id != employee_id || keep.contains(id));
        Ok(before - self.tables.addresses.len())
    }

    async fn load_aggregate(
        &mut self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeAggregate>, EmployeeRepositoryError> {
        self.tables.aggregate(id)
    }
}

/// Personnel store kept in process memory.
///
/// # Examples
/// ```
/// use personnel::domain::ports::DepartmentRepository;
/// use personnel::domain::DepartmentName;
/// use personnel::outbound::memory::InMemoryDirectory;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryDirectory::new();
/// let name = DepartmentName::new("Research").expect("valid name");
/// let created = store.create(&name).await.expect("insert succeeds");
/// assert_eq!(created.id.get(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    tables: Mutex<Tables>,
}

impl InMemoryDirectory {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` against a copy of the tables, keeping its writes only on
    /// success.
    pub(crate) async fn transact<T, F>(&self, work: F) -> Result<T, EmployeeWriteError>
    where
        F: for<'t> FnOnce(&'t mut Tables) -> BoxFuture<'t, Result<T, EmployeeWriteError>>,
    {
        let mut tables = self.tables.lock().await;
        let mut working = tables.clone();
        match work(&mut working).await {
            Ok(value) => {
                *tables = working;
                Ok(value)
            }
            Err(error) => {
                debug!(%error, "in-memory transaction rolled back");
                Err(error)
            }
        }
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryDirectory {
    async fn create(
        &self,
        aggregate: &NewEmployeeAggregate,
    ) -> Result<EmployeeAggregate, EmployeeWriteError> {
        let aggregate = aggregate.clone();
        self.transact(move |tables| {
            Box::pin(async move {
                let mut uow = MemoryUnitOfWork::new(tables);
                create_employee(&mut uow, &aggregate).await
            })
        })
        .await
    }

    async fn reconcile(
        &self,
        request: &EmployeeReconciliation,
    ) -> Result<EmployeeAggregate, EmployeeWriteError> {
        let request = request.clone();
        self.transact(move |tables| {
            Box::pin(async move {
                let mut uow = MemoryUnitOfWork::new(tables);
                reconcile_employee(&mut uow, &request).await
            })
        })
        .await
    }

    async fn find(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeAggregate>, EmployeeRepositoryError> {
        self.tables.lock().await.aggregate(id)
    }

    async fn list(&self) -> Result<Vec<EmployeeAggregate>, EmployeeRepositoryError> {
        let tables = self.tables.lock().await;
        tables
            .employees
            .keys()
            .filter_map(|id| tables.aggregate(*id).transpose())
            .collect()
    }

    async fn delete(&self, id: EmployeeId) -> Result<bool, EmployeeRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.employees.remove(&id).is_none() {
            return Ok(false);
        }
        tables.phone_numbers.retain(|_, phone| phone.employee_id != id);
        tables.addresses.retain(|_, address| address.employee_id != id);
        Ok(true)
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDirectory {
    async fn create(&self, name: &DepartmentName) -> Result<Department, DepartmentRepositoryError> {
        let mut tables = self.tables.lock().await;
        let id = DepartmentId::new(next_id(&mut tables.last_department_id));
        let now = Utc::now();
        let department = Department {
            id,
            name: name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.departments.insert(id, department.clone());
        Ok(department)
    }

    async fn find(
        &self,
        id: DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        Ok(self.tables.lock().await.departments.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        Ok(self.tables.lock().await.departments.values().cloned().collect())
    }

    async fn rename(
        &self,
        id: DepartmentId,
        name: &DepartmentName,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.departments.get_mut(&id).map(|department| {
            department.name = name.clone();
            department.updated_at = Utc::now();
            department.clone()
        }))
    }

    async fn delete(&self, id: DepartmentId) -> Result<bool, DepartmentRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables
            .employees
            .values()
            .any(|employee| employee.department_id == id)
        {
            return Err(DepartmentRepositoryError::in_use(id.get()));
        }
        Ok(tables.departments.remove(&id).is_some())
    }
}
