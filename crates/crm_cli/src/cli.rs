use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "Employee, customer and interaction-note records")]
#[command(version)]
pub struct Cli {
    /// TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// SQLite database path (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// Directory for rolling log files; logging stays off without one
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage employees
    #[command(subcommand)]
    Employee(EmployeeCommand),
    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Record and list interaction notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Move one customer to another employee
    ReassignCustomer {
        customer_id: i64,
        employee_id: i64,
    },
    /// Move every customer of one employee to another
    ReassignCustomers {
        old_employee_id: i64,
        new_employee_id: i64,
    },
    /// Hand customers over, archive the employee and delete it
    Retire {
        old_employee_id: i64,
        new_employee_id: i64,
    },
    /// Inspect archived employees
    #[command(subcommand)]
    Archive(ArchiveCommand),
}

#[derive(Subcommand)]
pub enum EmployeeCommand {
    /// Add a new employee
    Add(EmployeeAddArgs),
    /// Show one employee
    Show { id: i64 },
    /// List employees
    List(EmployeeListArgs),
    /// Delete an employee that owns no customers
    Delete { id: i64 },
}

#[derive(Args)]
pub struct EmployeeAddArgs {
    #[arg(short, long)]
    pub first: String,
    #[arg(short, long)]
    pub last: String,
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub department: String,
}

#[derive(Args)]
pub struct EmployeeListArgs {
    /// Match first name or department
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

#[derive(Subcommand)]
pub enum CustomerCommand {
    /// Add a customer owned by an existing employee
    Add(CustomerAddArgs),
    /// Show one customer
    Show { id: i64 },
    /// List customers, optionally those of one employee
    List(CustomerListArgs),
    /// Delete a customer and its notes
    Delete { id: i64 },
}

#[derive(Args)]
pub struct CustomerAddArgs {
    #[arg(short, long)]
    pub first: String,
    #[arg(short, long)]
    pub last: String,
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub phone: String,
    #[arg(short, long)]
    pub address: Option<String>,
    /// Owning employee id
    #[arg(long)]
    pub employee: i64,
}

#[derive(Args)]
pub struct CustomerListArgs {
    /// Only customers owned by this employee
    #[arg(long)]
    pub employee: Option<i64>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Attach a note to a customer
    Add(NoteAddArgs),
    /// List notes of a customer, oldest first
    List { customer_id: i64 },
}

#[derive(Args)]
pub struct NoteAddArgs {
    #[arg(long)]
    pub customer: i64,
    /// EMAIL, PHONE_CALL, MEETING or OTHER
    #[arg(short = 't', long = "type", default_value = "OTHER")]
    pub interaction_type: String,
    /// Interaction date as YYYY-MM-DD; defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
    pub content: String,
}

#[derive(Subcommand)]
pub enum ArchiveCommand {
    /// Show the archived profile of a retired employee
    Show { original_id: i64 },
    /// List archived employees
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value = "0")]
        offset: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, NoteCommand};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["crm", "retire", "4", "9", "--json", "--db", "crm.db"]);
        assert!(cli.json);
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("crm.db")));
        assert!(matches!(
            cli.command,
            Commands::Retire {
                old_employee_id: 4,
                new_employee_id: 9
            }
        ));
    }

    #[test]
    fn note_date_parses_as_calendar_date() {
        let cli = Cli::parse_from([
            "crm", "note", "add", "--customer", "3", "-t", "meeting", "-d", "2024-05-02", "lunch",
        ]);
        match cli.command {
            Commands::Note(NoteCommand::Add(args)) => {
                assert_eq!(args.customer, 3);
                assert_eq!(args.date.map(|d| d.to_string()).as_deref(), Some("2024-05-02"));
                assert_eq!(args.content, "lunch");
            }
            _ => panic!("expected note add"),
        }
    }
}
