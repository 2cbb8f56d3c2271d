//! Signup form example - declaring a model class and validating user input
//!
//! Run with `RUST_LOG=debug` to see validation passes logged.

use std::sync::Arc;
use std::time::Duration;

use tidewater::events::Event;
use tidewater::validator::Options;
use tidewater::{
    ClassBuilder, DeclarationError, Model, ModelClass, Registry, ValidateOptions, Value,
};

// Stand-in for a server-side lookup
async fn username_available(username: Value) -> bool {
    tokio::time::sleep(Duration::from_millis(20)).await;
    !matches!(username.to_string().as_str(), "admin" | "root")
}

fn declare(
    registry: &mut Registry,
) -> Result<(Arc<ModelClass>, Arc<ModelClass>), DeclarationError> {
    let signup = registry.register(
        ClassBuilder::new("Signup")
            .accessible(["username", "email", "password", "password_confirmation", "age", "terms"])
            .validates("username", "presence", Options::new())
            .validates("username", "length", Options::new().minimum(3).maximum(16))
            .validates("username", "remote", Options::new().remote(username_available))
            .validates("email", "format", Options::new().with(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"))
            .validates("password", "length", Options::new().minimum(8))
            .validates("password", "confirmation", Options::new())
            .validates("age", "range", Options::new().min(13).message("is too young to sign up"))
            .validates("terms", "acceptance", Options::new()),
    )?;

    // Business accounts need a company name, everything else is inherited
    let business = registry.register(
        ClassBuilder::new("BusinessSignup")
            .extends("Signup")
            .accessible(["company"])
            .validates("company", "presence", Options::new()),
    )?;

    Ok((signup, business))
}

fn print_result(model: &Model) {
    if model.errors().is_empty() {
        println!("✓ Valid: {}", model.to_json());
    } else {
        for message in model.full_messages() {
            println!("✗ {}", message);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), DeclarationError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut registry = Registry::new();
    let (signup, business) = declare(&mut registry)?;

    println!("=== Signup Form Validation ===\n");

    // Test 1: all valid
    println!("Test 1: Valid form");
    let mut model = Model::new(&signup, Vec::<(String, Value)>::new());
    model.assign([
        ("username", Value::from("ada")),
        ("email", Value::from("ada@example.com")),
        ("password", Value::from("correct horse")),
        ("password_confirmation", Value::from("correct horse")),
        ("age", Value::from("36")),
        ("terms", Value::from("1")),
    ]);
    model.validate(ValidateOptions::default()).await;
    print_result(&model);

    println!("\n---\n");

    // Test 2: every error is reported at once, in declaration order
    println!("Test 2: Multiple validation errors");
    let mut model = Model::new(&signup, Vec::<(String, Value)>::new());
    model.on("invalid:password_confirmation", |event: &Event<'_>| {
        println!("  (event) {}", event.name());
    });
    model.assign([
        ("username", Value::from("admin")),
        ("email", Value::from("not-an-email")),
        ("password", Value::from("weak")),
        ("password_confirmation", Value::from("different")),
        ("age", Value::from(9)),
    ]);
    model.validate(ValidateOptions::default()).await;
    print_result(&model);

    println!("\n---\n");

    // Test 3: subclass inherits the parent's rules and adds its own
    println!("Test 3: Business signup");
    let mut model = Model::new(&business, Vec::<(String, Value)>::new());
    let assigned = model.assign([
        ("username", Value::from("grace")),
        ("email", Value::from("grace@navy.mil")),
        ("password", Value::from("cobol-forever")),
        ("password_confirmation", Value::from("cobol-forever")),
        ("age", Value::from(85)),
        ("terms", Value::from("1")),
        ("is_admin", Value::from(true)),
    ]);
    println!("  assigned: {:?}", assigned);
    model.validate(ValidateOptions::default()).await;
    print_result(&model);

    Ok(())
}
