//! Interactive student menu

use crate::config::Settings;
use crate::storage::{open_cache, Database, PgStudentStore};
use anyhow::Result;
use colored::Colorize;
use roster_core::{Student, StudentPatch, StudentService};
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Create,
    Read,
    Update,
    Delete,
    List,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Create),
            "2" => Some(MenuChoice::Read),
            "3" => Some(MenuChoice::Update),
            "4" => Some(MenuChoice::Delete),
            "5" => Some(MenuChoice::List),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Tabled)]
struct StudentTableRow {
    id: i32,
    name: String,
    email: String,
    course: String,
    created_at: String,
}

impl From<&Student> for StudentTableRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            email: s.email.clone(),
            course: s.course.clone(),
            created_at: s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn render_table(students: &[Student]) -> String {
    let rows: Vec<StudentTableRow> = students.iter().map(StudentTableRow::from).collect();
    Table::new(rows).with(Style::ascii()).to_string()
}

pub async fn run(settings: &Settings) -> Result<()> {
    let db = Database::connect(settings.pg_connect_options()).await?;
    db.apply_schema(&settings.schema_path).await?;

    let cache = open_cache(settings)?;
    let service = StudentService::new(Arc::new(PgStudentStore::new(db)), cache);

    loop {
        println!();
        println!("{}", "1-Create 2-Read 3-Update 4-Delete 5-List 0-Exit".blue().bold());

        let input: String = dialoguer::Input::new()
            .with_prompt("»")
            .allow_empty(true)
            .interact_text()?;

        let Some(choice) = MenuChoice::parse(&input) else {
            continue;
        };
        if choice == MenuChoice::Exit {
            break;
        }

        // Store or cache failures end the operation, not the session
        if let Err(e) = handle(&service, choice).await {
            error!("Operation failed: {:#}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
    }

    Ok(())
}

async fn handle(service: &StudentService, choice: MenuChoice) -> Result<()> {
    match choice {
        MenuChoice::Create => {
            let name = prompt_text("Name")?;
            let email = prompt_text("Email")?;
            let course = prompt_text("Course")?;

            let student = service.create(&name, &email, &course).await?;
            print_student(Some(&student));
        }
        MenuChoice::Read => {
            let id = prompt_id()?;
            print_student(service.read(id).await?.as_ref());
        }
        MenuChoice::Update => {
            let id = prompt_id()?;
            println!("{}", "Leave a field blank to keep its value".dimmed());
            let name = prompt_text("Name")?;
            let email = prompt_text("Email")?;
            let course = prompt_text("Course")?;

            let patch = StudentPatch::from_input(&name, &email, &course);
            print_student(service.update(id, &patch).await?.as_ref());
        }
        MenuChoice::Delete => {
            let id = prompt_id()?;
            if service.delete(id).await? {
                println!("{}", format!("✅ Deleted student {}", id).green());
            } else {
                println!("{}", format!("No student with id {}", id).yellow());
            }
        }
        MenuChoice::List => {
            let students = service.list().await?;
            if students.is_empty() {
                println!("   (No students)");
            } else {
                println!("{}", render_table(&students));
            }
        }
        MenuChoice::Exit => {}
    }

    Ok(())
}

// Values are taken literally; only an empty update field means "unchanged"
fn prompt_text(label: &str) -> Result<String> {
    let value: String = dialoguer::Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

fn prompt_id() -> Result<i32> {
    let id: i32 = dialoguer::Input::new().with_prompt("ID").interact_text()?;
    Ok(id)
}

fn print_student(student: Option<&Student>) {
    match student {
        Some(s) => {
            println!("   {} {}", "ID:".dimmed(), s.id.to_string().cyan());
            println!("   {} {}", "Name:".dimmed(), s.name);
            println!("   {} {}", "Email:".dimmed(), s.email);
            println!("   {} {}", "Course:".dimmed(), s.course);
            println!(
                "   {} {}",
                "Created:".dimmed(),
                s.created_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        None => println!("{}", "Not found".yellow()),
    }
}
