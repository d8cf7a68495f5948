//! Reconciler behaviour against a mocked unit of work.
//!
//! Mocks fail on any unexpected call, so each test also proves which writes
//! did not happen.

use chrono::{DateTime, Utc};
use mockall::Sequence;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockEmployeeUnitOfWork;
use crate::domain::{
    AddressFields, AddressId, AddressLine, DepartmentName, DepartmentSummary, Employee,
    EmployeePatch, NewEmployee, PersonName, PhoneNumberFields, PhoneNumberId, PhoneValue,
};

const EMPLOYEE: EmployeeId = EmployeeId::new(10);
const DEPARTMENT: DepartmentId = DepartmentId::new(3);

fn phone(value: &str) -> PhoneNumberFields {
    PhoneNumberFields::new(PhoneValue::new(value).expect("valid phone"))
}

fn address(line1: &str) -> AddressFields {
    AddressFields::new(AddressLine::new(line1).expect("valid line"))
}

#[fixture]
fn employee() -> Employee {
    Employee {
        id: EMPLOYEE,
        first_name: PersonName::new("Ada").expect("valid name"),
        last_name: None,
        email: None,
        date_of_birth: None,
        designation: None,
        department_id: DEPARTMENT,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[fixture]
fn aggregate(employee: Employee) -> EmployeeAggregate {
    EmployeeAggregate {
        employee,
        department: DepartmentSummary {
            id: DEPARTMENT,
            name: DepartmentName::new("Research").expect("valid name"),
        },
        phone_numbers: Vec::new(),
        addresses: Vec::new(),
    }
}

fn expect_existing_employee(uow: &mut MockEmployeeUnitOfWork, employee: Employee) {
    uow.expect_lock_employee()
        .withf(|id| *id == EMPLOYEE)
        .times(1)
        .returning(move |_| Ok(Some(employee.clone())));
}

fn expect_reload(uow: &mut MockEmployeeUnitOfWork, aggregate: EmployeeAggregate) {
    uow.expect_load_aggregate()
        .times(1)
        .returning(move |_| Ok(Some(aggregate.clone())));
}

#[rstest]
fn planner_overwrites_owned_ids_and_creates_the_rest() {
    let persisted = [PhoneNumberId::new(1), PhoneNumberId::new(2)];
    let submissions = vec![
        ChildSubmission::update(PhoneNumberId::new(1), "a"),
        ChildSubmission::create("b"),
        ChildSubmission::update(PhoneNumberId::new(99), "c"),
    ];

    let plan = plan_children(&persisted, &submissions);

    assert_eq!(
        plan,
        vec![
            ChildAction::Overwrite {
                id: PhoneNumberId::new(1),
                fields: &"a",
            },
            ChildAction::Create { fields: &"b" },
            ChildAction::Create { fields: &"c" },
        ]
    );
}

#[rstest]
fn planner_returns_nothing_for_empty_submission() {
    let persisted = [AddressId::new(1)];
    let submissions: Vec<ChildSubmission<AddressId, ()>> = Vec::new();
    assert!(plan_children(&persisted, &submissions).is_empty());
}

#[rstest]
#[tokio::test]
async fn missing_employee_fails_before_any_write() {
    let mut uow = MockEmployeeUnitOfWork::new();
    uow.expect_lock_employee().times(1).returning(|_| Ok(None));

    let mut request = EmployeeReconciliation::new(EMPLOYEE);
    request.patch.first_name = PersonName::new("Grace").ok();
    request.phone_numbers = Some(vec![ChildSubmission::create(phone("111"))]);
    request.addresses = Some(Vec::new());

    let result = reconcile_employee(&mut uow, &request).await;

    assert_eq!(result, Err(EmployeeWriteError::EmployeeNotFound(EMPLOYEE)));
}

#[rstest]
#[tokio::test]
async fn updates_matching_phone_creates_new_and_deletes_the_rest(
    employee: Employee,
    aggregate: EmployeeAggregate,
) {
    let mut uow = MockEmployeeUnitOfWork::new();
    let mut seq = Sequence::new();
    expect_existing_employee(&mut uow, employee);
    uow.expect_phone_number_ids()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec![PhoneNumberId::new(1), PhoneNumberId::new(2)]));
    uow.expect_update_phone_number()
        .withf(|employee_id, id, fields| {
            *employee_id == EMPLOYEE
                && *id == PhoneNumberId::new(1)
                && fields.phone.as_str() == "111-updated"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    uow.expect_insert_phone_number()
        .withf(|employee_id, fields| *employee_id == EMPLOYEE && fields.phone.as_str() == "333")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(PhoneNumberId::new(3)));
    uow.expect_delete_phone_numbers_except()
        .withf(|employee_id, keep| {
            *employee_id == EMPLOYEE
                && keep.to_vec() == vec![PhoneNumberId::new(1), PhoneNumberId::new(3)]
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(1));
    expect_reload(&mut uow, aggregate.clone());

    let mut request = EmployeeReconciliation::new(EMPLOYEE);
    request.phone_numbers = Some(vec![
        ChildSubmission::update(PhoneNumberId::new(1), phone("111-updated")),
        ChildSubmission::create(phone("333")),
    ]);

    let result = reconcile_employee(&mut uow, &request)
        .await
        .expect("reconciliation succeeds");

    assert_eq!(result, aggregate);
}

#[rstest]
#[tokio::test]
async fn empty_address_submission_deletes_every_address(
    employee: Employee,
    aggregate: EmployeeAggregate,
) {
    let mut uow = MockEmployeeUnitOfWork::new();
    expect_existing_employee(&mut uow, employee);
    uow.expect_address_ids()
        .times(1)
        .returning(|_| Ok(vec![AddressId::new(4), AddressId::new(5)]));
    uow.expect_delete_addresses_except()
        .withf(|_, keep| keep.is_empty())
        .times(1)
        .returning(|_, _| Ok(2));
    expect_reload(&mut uow, aggregate);

    let mut request = EmployeeReconciliation::new(EMPLOYEE);
    request.addresses = Some(Vec::new());

    reconcile_employee(&mut uow, &request)
        .await
        .expect("reconciliation succeeds");
}

#[rstest]
#[tokio::test]
async fn foreign_child_id_creates_a_new_row(employee: Employee, aggregate: EmployeeAggregate) {
    let mut uow = MockEmployeeUnitOfWork::new();
    expect_existing_employee(&mut uow, employee);
    uow.expect_address_ids()
        .times(1)
        .returning(|_| Ok(vec![AddressId::new(4)]));
    uow.expect_insert_address()
        .withf(|employee_id, fields| {
            *employee_id == EMPLOYEE && fields.line1.as_str() == "1 Analytical Row"
        })
        .times(1)
        .returning(|_, _| Ok(AddressId::new(8)));
    uow.expect_delete_addresses_except()
        .withf(|_, keep| keep.to_vec() == vec![AddressId::new(8)])
        .times(1)
        .returning(|_, _| Ok(1));
    expect_reload(&mut uow, aggregate);

    let mut request = EmployeeReconciliation::new(EMPLOYEE);
    request.addresses = Some(vec![ChildSubmission::update(
        AddressId::new(77),
        address("1 Analytical Row"),
    )]);

    reconcile_employee(&mut uow, &request)
        .await
        .expect("reconciliation succeeds");
}

#[rstest]
#[tokio::test]
async fn absent_collections_and_empty_patch_only_reload(
    employee: Employee,
    aggregate: EmployeeAggregate,
) {
    let mut uow = MockEmployeeUnitOfWork::new();
    expect_existing_employee(&mut uow, employee);
    expect_reload(&mut uow, aggregate.clone());

    let result = reconcile_employee(&mut uow, &EmployeeReconciliation::new(EMPLOYEE))
        .await
        .expect("reconciliation succeeds");

    assert_eq!(result, aggregate);
}

#[rstest]
#[tokio::test]
async fn unknown_department_in_patch_stops_before_update(employee: Employee) {
    let mut uow = MockEmployeeUnitOfWork::new();
    expect_existing_employee(&mut uow, employee);
    uow.expect_department_exists()
        .withf(|id| *id == DepartmentId::new(404))
        .times(1)
        .returning(|_| Ok(false));

    let mut request = EmployeeReconciliation::new(EMPLOYEE);
    request.patch = EmployeePatch {
        department_id: Some(DepartmentId::new(404)),
        ..EmployeePatch::default()
    };

    let result = reconcile_employee(&mut uow, &request).await;

    assert_eq!(
        result,
        Err(EmployeeWriteError::DepartmentNotFound(DepartmentId::new(404)))
    );
}

#[rstest]
#[tokio::test]
async fn storage_failure_on_addresses_is_surfaced(employee: Employee) {
    let mut uow = MockEmployeeUnitOfWork::new();
    expect_existing_employee(&mut uow, employee);
    uow.expect_phone_number_ids().returning(|_| Ok(Vec::new()));
    uow.expect_insert_phone_number()
        .returning(|_, _| Ok(PhoneNumberId::new(1)));
    uow.expect_delete_phone_numbers_except()
        .returning(|_, _| Ok(0));
    uow.expect_address_ids()
        .returning(|_| Err(EmployeeRepositoryError::connection("socket closed")));

    let mut request = EmployeeReconciliation::new(EMPLOYEE);
    request.phone_numbers = Some(vec![ChildSubmission::create(phone("111"))]);
    request.addresses = Some(vec![ChildSubmission::create(address("Somewhere"))]);

    let result = reconcile_employee(&mut uow, &request).await;

    assert_eq!(
        result,
        Err(EmployeeWriteError::Storage(
            EmployeeRepositoryError::connection("socket closed")
        ))
    );
}

#[rstest]
#[tokio::test]
async fn create_inserts_employee_then_children(aggregate: EmployeeAggregate) {
    let mut uow = MockEmployeeUnitOfWork::new();
    let mut seq = Sequence::new();
    uow.expect_department_exists()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(true));
    uow.expect_insert_employee()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(EMPLOYEE));
    uow.expect_insert_phone_number()
        .withf(|employee_id, _| *employee_id == EMPLOYEE)
        .times(2)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(PhoneNumberId::new(1)));
    uow.expect_insert_address()
        .withf(|employee_id, _| *employee_id == EMPLOYEE)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(AddressId::new(1)));
    expect_reload(&mut uow, aggregate.clone());

    let new = NewEmployeeAggregate {
        employee: NewEmployee {
            first_name: PersonName::new("Ada").expect("valid name"),
            last_name: None,
            email: None,
            date_of_birth: None,
            designation: None,
            department_id: DEPARTMENT,
        },
        phone_numbers: vec![phone("111"), phone("222")],
        addresses: vec![address("12 St James's Square")],
    };

    let created = create_employee(&mut uow, &new)
        .await
        .expect("creation succeeds");

    assert_eq!(created, aggregate);
}

#[rstest]
#[tokio::test]
async fn create_with_unknown_department_writes_nothing() {
    let mut uow = MockEmployeeUnitOfWork::new();
    uow.expect_department_exists().returning(|_| Ok(false));

    let new = NewEmployeeAggregate {
        employee: NewEmployee {
            first_name: PersonName::new("Ada").expect("valid name"),
            last_name: None,
            email: None,
            date_of_birth: None,
            designation: None,
            department_id: DEPARTMENT,
        },
        phone_numbers: vec![phone("111")],
        addresses: Vec::new(),
    };

    let result = create_employee(&mut uow, &new).await;

    assert_eq!(result, Err(EmployeeWriteError::DepartmentNotFound(DEPARTMENT)));
}
