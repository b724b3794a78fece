use chrono::NaiveDate;
use crm_core::db::open_db_in_memory;
use crm_core::{
    ArchivalRecorder, CoreError, Customer, CustomerService, Employee, EmployeeListQuery,
    EmployeePatch, EmployeeService, EntityKind, EntityValidator, InteractionType, NewCustomer,
    NewEmployee, NewNote, NoteService, OwnershipOrchestrator, PageQuery,
    SqliteArchivedEmployeeRepository, ValidationError,
};
use rusqlite::Connection;

#[test]
fn create_employee_rejects_duplicate_email_case_insensitively() {
    let mut conn = open_db_in_memory().unwrap();
    seed_employee(&mut conn, "Alice", "alice@example.com");

    let err = EmployeeService::new(&mut conn)
        .create_employee(&NewEmployee::new(
            "Alicia",
            "Other",
            "ALICE@example.com",
            "Support",
        ))
        .unwrap_err();

    assert_eq!(err.error_code(), "invalid_argument");
    assert!(err.to_string().contains("already used"));
}

#[test]
fn create_employee_reports_field_validation() {
    let mut conn = open_db_in_memory().unwrap();

    let err = EmployeeService::new(&mut conn)
        .create_employee(&NewEmployee::new("A", "Tester", "a@example.com", "Sales"))
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::Length {
            field: "first_name",
            ..
        })
    ));
    assert_eq!(err.error_code(), "validation_failed");
}

#[test]
fn get_missing_employee_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();

    let err = EmployeeService::new(&mut conn).get_employee(12).unwrap_err();

    assert_eq!(err.to_string(), "Employee not found with ID: 12");
    assert_eq!(err.error_code(), "not_found");
}

#[test]
fn patch_employee_updates_present_fields_only() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let mut service = EmployeeService::new(&mut conn);

    let unchanged = service
        .patch_employee(alice.id, &EmployeePatch::default())
        .unwrap();
    assert_eq!(unchanged, alice);

    let patched = service
        .patch_employee(
            alice.id,
            &EmployeePatch {
                department: Some("Support".to_string()),
                ..EmployeePatch::default()
            },
        )
        .unwrap();
    assert_eq!(patched.department, "Support");
    assert_eq!(patched.email, alice.email);
    assert_eq!(service.get_employee(alice.id).unwrap(), patched);
}

#[test]
fn update_employee_keeps_own_email() {
    let mut conn = open_db_in_memory().unwrap();
    let mut alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    alice.last_name = "Renamed".to_string();

    let updated = EmployeeService::new(&mut conn)
        .update_employee(&alice)
        .unwrap();

    assert_eq!(updated.last_name, "Renamed");
}

#[test]
fn delete_employee_refuses_while_customers_are_owned() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let bruno = seed_employee(&mut conn, "Bruno", "bruno@example.com");
    seed_customer(&mut conn, "cleo@example.com", alice.id);

    let err = EmployeeService::new(&mut conn)
        .delete_employee(alice.id)
        .unwrap_err();
    assert_eq!(err.error_code(), "invalid_argument");
    assert!(err.to_string().contains("retire"));

    EmployeeService::new(&mut conn)
        .delete_employee(bruno.id)
        .unwrap();
    let listed = EmployeeService::new(&mut conn)
        .list_employees(&EmployeeListQuery::default())
        .unwrap();
    assert_eq!(listed.items, vec![alice]);
    assert_eq!(listed.applied_limit, 20);
}

#[test]
fn create_customer_requires_existing_owner() {
    let mut conn = open_db_in_memory().unwrap();

    let err = CustomerService::new(&mut conn)
        .create_customer(&NewCustomer::new(
            "Cleo",
            "Customer",
            "cleo@example.com",
            "0123456789",
            7,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::NotFound {
            kind: EntityKind::Employee,
            id: 7
        }
    ));
    let listed = CustomerService::new(&mut conn)
        .list_customers(&PageQuery::default())
        .unwrap();
    assert!(listed.items.is_empty());
}

#[test]
fn update_customer_cannot_point_at_missing_employee() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let mut cleo = seed_customer(&mut conn, "cleo@example.com", alice.id);
    cleo.employee_id = 99;

    let err = CustomerService::new(&mut conn)
        .update_customer(&cleo)
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::NotFound {
            kind: EntityKind::Employee,
            id: 99
        }
    ));
}

#[test]
fn delete_customer_removes_its_notes() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let cleo = seed_customer(&mut conn, "cleo@example.com", alice.id);
    let dana = seed_customer(&mut conn, "dana@example.com", alice.id);
    seed_note(&mut conn, cleo.id, "intro email", InteractionType::Email);
    seed_note(&mut conn, cleo.id, "call back", InteractionType::PhoneCall);
    let kept = seed_note(&mut conn, dana.id, "lunch", InteractionType::Meeting);

    let removed = CustomerService::new(&mut conn)
        .delete_customer(cleo.id)
        .unwrap();

    assert_eq!(removed, 2);
    let notes = NoteService::new(&mut conn);
    assert!(matches!(
        notes.list_notes_for_customer(cleo.id).unwrap_err(),
        CoreError::NotFound {
            kind: EntityKind::Customer,
            ..
        }
    ));
    assert_eq!(notes.list_notes_for_customer(dana.id).unwrap(), vec![kept]);
}

#[test]
fn list_customers_by_employee_requires_existing_employee() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let cleo = seed_customer(&mut conn, "cleo@example.com", alice.id);
    let service = CustomerService::new(&mut conn);

    assert_eq!(
        service.list_customers_by_employee(alice.id).unwrap(),
        vec![cleo]
    );
    assert_eq!(
        service
            .list_customers_by_employee(404)
            .unwrap_err()
            .error_code(),
        "not_found"
    );
}

#[test]
fn note_creation_requires_existing_customer() {
    let mut conn = open_db_in_memory().unwrap();

    let err = NoteService::new(&mut conn)
        .create_note_for_customer(
            3,
            &NewNote::new(
                "orphan",
                NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                InteractionType::Other,
            ),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::NotFound {
            kind: EntityKind::Customer,
            id: 3
        }
    ));
}

#[test]
fn note_update_and_delete_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let cleo = seed_customer(&mut conn, "cleo@example.com", alice.id);
    let mut note = seed_note(&mut conn, cleo.id, "draft", InteractionType::Other);
    let mut service = NoteService::new(&mut conn);

    note.content = "met at the fair".to_string();
    note.interaction_type = InteractionType::Meeting;
    service.update_note(&note).unwrap();
    assert_eq!(service.get_note(note.id).unwrap(), note);

    service.delete_note(note.id).unwrap();
    assert!(matches!(
        service.delete_note(note.id).unwrap_err(),
        CoreError::NotFound {
            kind: EntityKind::Note,
            ..
        }
    ));
}

#[test]
fn note_content_longer_than_limit_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let cleo = seed_customer(&mut conn, "cleo@example.com", alice.id);

    let err = NoteService::new(&mut conn)
        .create_note_for_customer(
            cleo.id,
            &NewNote::new(
                "x".repeat(1001),
                NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                InteractionType::Email,
            ),
        )
        .unwrap_err();

    assert_eq!(err.error_code(), "validation_failed");
}

#[test]
fn entity_validator_reports_kind_and_id() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let validator = EntityValidator::new(&conn);

    validator.ensure_exists(EntityKind::Employee, alice.id).unwrap();
    for kind in [
        EntityKind::Employee,
        EntityKind::Customer,
        EntityKind::Note,
        EntityKind::ArchivedEmployee,
    ] {
        let err = validator.ensure_exists(kind, 321).unwrap_err();
        assert!(
            matches!(err, CoreError::NotFound { kind: found, id: 321 } if found == kind),
            "unexpected error for {kind}: {err}"
        );
    }
    assert!(!validator.employee_has_customers(alice.id).unwrap());
}

#[test]
fn archived_employee_is_found_by_original_id_after_retirement() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_employee(&mut conn, "Alice", "alice@example.com");
    let bruno = seed_employee(&mut conn, "Bruno", "bruno@example.com");
    seed_customer(&mut conn, "cleo@example.com", alice.id);
    OwnershipOrchestrator::new(&mut conn)
        .delete_employee_and_reassign_customers(alice.id, bruno.id)
        .unwrap();

    EntityValidator::new(&conn)
        .ensure_archived_employee_exists(alice.id)
        .unwrap();
    let recorder = ArchivalRecorder::new(SqliteArchivedEmployeeRepository::new(&conn));
    let archived = recorder.find_by_original_employee_id(alice.id).unwrap();
    assert_eq!(archived.full_name(), "Alice Tester");
    assert_eq!(recorder.get_archived_employee(archived.id).unwrap(), archived);
    assert!(!recorder.exists_by_original_employee_id(bruno.id).unwrap());
    assert_eq!(
        recorder
            .list_archived_employees(&PageQuery::default())
            .unwrap()
            .items,
        vec![archived]
    );
}

fn seed_employee(conn: &mut Connection, first_name: &str, email: &str) -> Employee {
    EmployeeService::new(conn)
        .create_employee(&NewEmployee::new(first_name, "Tester", email, "Sales"))
        .unwrap()
}

fn seed_customer(conn: &mut Connection, email: &str, employee_id: i64) -> Customer {
    CustomerService::new(conn)
        .create_customer(&NewCustomer::new(
            "Cleo",
            "Customer",
            email,
            "0123456789",
            employee_id,
        ))
        .unwrap()
}

fn seed_note(
    conn: &mut Connection,
    customer_id: i64,
    content: &str,
    interaction_type: InteractionType,
) -> crm_core::Note {
    NoteService::new(conn)
        .create_note_for_customer(
            customer_id,
            &NewNote::new(
                content,
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                interaction_type,
            ),
        )
        .unwrap()
}
