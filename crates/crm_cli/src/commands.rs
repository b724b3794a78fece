//! Subcommand dispatch and rendering.

use crate::cli::{
    ArchiveCommand, Commands, CustomerAddArgs, CustomerCommand, CustomerListArgs,
    EmployeeAddArgs, EmployeeCommand, EmployeeListArgs, NoteAddArgs, NoteCommand,
};
use crm_core::db::Connection;
use crm_core::{
    ArchivalRecorder, ArchivedEmployee, CoreError, Customer, CustomerService, Employee,
    EmployeeListQuery, EmployeeService, InteractionType, NewCustomer, NewEmployee, NewNote, Note,
    NoteService, OwnershipOrchestrator, PageQuery, RetirementOutcome,
    SqliteArchivedEmployeeRepository,
};
use serde::Serialize;
use serde_json::json;

pub fn dispatch(conn: &mut Connection, command: Commands, as_json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Employee(command) => run_employee(conn, command, as_json),
        Commands::Customer(command) => run_customer(conn, command, as_json),
        Commands::Note(command) => run_note(conn, command, as_json),
        Commands::ReassignCustomer {
            customer_id,
            employee_id,
        } => {
            let customer = OwnershipOrchestrator::new(conn)
                .reassign_customer_to_employee(customer_id, employee_id)?;
            emit(as_json, &customer, |c| {
                format!("customer {} now owned by employee {}", c.id, c.employee_id)
            })
        }
        Commands::ReassignCustomers {
            old_employee_id,
            new_employee_id,
        } => {
            let moved = OwnershipOrchestrator::new(conn)
                .reassign_customers(old_employee_id, new_employee_id)?;
            emit(as_json, &moved, |moved| {
                format!(
                    "moved {} customer(s) from employee {} to employee {}",
                    moved.len(),
                    old_employee_id,
                    new_employee_id
                )
            })
        }
        Commands::Retire {
            old_employee_id,
            new_employee_id,
        } => {
            let outcome = OwnershipOrchestrator::new(conn)
                .delete_employee_and_reassign_customers(old_employee_id, new_employee_id)?;
            emit(as_json, &outcome, retirement_line)
        }
        Commands::Archive(command) => run_archive(conn, command, as_json),
    }
}

fn run_employee(
    conn: &mut Connection,
    command: EmployeeCommand,
    as_json: bool,
) -> anyhow::Result<()> {
    let mut service = EmployeeService::new(conn);
    match command {
        EmployeeCommand::Add(EmployeeAddArgs {
            first,
            last,
            email,
            department,
        }) => {
            let employee =
                service.create_employee(&NewEmployee::new(first, last, email, department))?;
            emit(as_json, &employee, |e| format!("created {}", employee_line(e)))
        }
        EmployeeCommand::Show { id } => {
            let employee = service.get_employee(id)?;
            emit(as_json, &employee, employee_line)
        }
        EmployeeCommand::List(EmployeeListArgs {
            search,
            limit,
            offset,
        }) => {
            let listed = service.list_employees(&EmployeeListQuery {
                search,
                page: PageQuery { limit, offset },
            })?;
            emit(as_json, &listed, |listed| {
                lines(&listed.items, employee_line, "no employees")
            })
        }
        EmployeeCommand::Delete { id } => {
            service.delete_employee(id)?;
            emit(as_json, &json!({ "deleted_employee_id": id }), |_| {
                format!("deleted employee {id}")
            })
        }
    }
}

fn run_customer(
    conn: &mut Connection,
    command: CustomerCommand,
    as_json: bool,
) -> anyhow::Result<()> {
    let mut service = CustomerService::new(conn);
    match command {
        CustomerCommand::Add(CustomerAddArgs {
            first,
            last,
            email,
            phone,
            address,
            employee,
        }) => {
            let mut new_customer = NewCustomer::new(first, last, email, phone, employee);
            new_customer.address = address;
            let customer = service.create_customer(&new_customer)?;
            emit(as_json, &customer, |c| format!("created {}", customer_line(c)))
        }
        CustomerCommand::Show { id } => {
            let customer = service.get_customer(id)?;
            emit(as_json, &customer, customer_line)
        }
        CustomerCommand::List(CustomerListArgs {
            employee: Some(employee_id),
            ..
        }) => {
            let customers = service.list_customers_by_employee(employee_id)?;
            emit(as_json, &customers, |customers| {
                lines(customers, customer_line, "no customers")
            })
        }
        CustomerCommand::List(CustomerListArgs {
            employee: None,
            limit,
            offset,
        }) => {
            let listed = service.list_customers(&PageQuery { limit, offset })?;
            emit(as_json, &listed, |listed| {
                lines(&listed.items, customer_line, "no customers")
            })
        }
        CustomerCommand::Delete { id } => {
            let removed_notes = service.delete_customer(id)?;
            emit(
                as_json,
                &json!({ "deleted_customer_id": id, "removed_notes": removed_notes }),
                |_| format!("deleted customer {id} and {removed_notes} note(s)"),
            )
        }
    }
}

fn run_note(conn: &mut Connection, command: NoteCommand, as_json: bool) -> anyhow::Result<()> {
    let mut service = NoteService::new(conn);
    match command {
        NoteCommand::Add(NoteAddArgs {
            customer,
            interaction_type,
            date,
            content,
        }) => {
            let kind = InteractionType::parse(&interaction_type).ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "unknown interaction type `{interaction_type}`"
                ))
            })?;
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let note =
                service.create_note_for_customer(customer, &NewNote::new(content, date, kind))?;
            emit(as_json, &note, |n| format!("created {}", note_line(n)))
        }
        NoteCommand::List { customer_id } => {
            let notes = service.list_notes_for_customer(customer_id)?;
            emit(as_json, &notes, |notes| lines(notes, note_line, "no notes"))
        }
    }
}

fn run_archive(conn: &Connection, command: ArchiveCommand, as_json: bool) -> anyhow::Result<()> {
    let recorder = ArchivalRecorder::new(SqliteArchivedEmployeeRepository::new(conn));
    match command {
        ArchiveCommand::Show { original_id } => {
            let archived = recorder.find_by_original_employee_id(original_id)?;
            emit(as_json, &archived, archive_line)
        }
        ArchiveCommand::List { limit, offset } => {
            let listed = recorder.list_archived_employees(&PageQuery { limit, offset })?;
            emit(as_json, &listed, |listed| {
                lines(&listed.items, archive_line, "no archived employees")
            })
        }
    }
}

fn emit<T: Serialize>(
    as_json: bool,
    value: &T,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}

fn lines<T>(items: &[T], render: fn(&T) -> String, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}

fn employee_line(employee: &Employee) -> String {
    format!(
        "employee {}: {} <{}> [{}]",
        employee.id,
        employee.full_name(),
        employee.email,
        employee.department
    )
}

fn customer_line(customer: &Customer) -> String {
    let last_contact = customer
        .last_interaction_date
        .map(|date| format!(" last contact {date}"))
        .unwrap_or_default();
    format!(
        "customer {}: {} {} <{}> {} owner={}{}",
        customer.id,
        customer.first_name,
        customer.last_name,
        customer.email,
        customer.phone,
        customer.employee_id,
        last_contact
    )
}

fn note_line(note: &Note) -> String {
    format!(
        "note {} ({} {}) customer={}: {}",
        note.id,
        note.date,
        note.interaction_type.as_db_str(),
        note.customer_id,
        note.content
    )
}

fn archive_line(archived: &ArchivedEmployee) -> String {
    format!(
        "archived {} (was employee {}): {} <{}> [{}]",
        archived.id,
        archived.original_employee_id,
        archived.full_name(),
        archived.email,
        archived.department
    )
}

fn retirement_line(outcome: &RetirementOutcome) -> String {
    format!(
        "retired employee {}; {} customer(s) moved to employee {}; archive id {}",
        outcome.archived.original_employee_id,
        outcome.reassigned_customers.len(),
        outcome.new_employee_id,
        outcome.archived.id
    )
}
