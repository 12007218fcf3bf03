use price_desk::models::entry::Role;
use price_desk::services::pdf_picker::PathPicker;
use price_desk::services::price_form::SubmitOutcome;
use price_desk::services::price_screen::{CardAction, ScreenEvent};
use price_desk::services::slice::PriceSlice;
use price_desk::utils::display::DisplayFormatter;
use price_desk::{Config, HttpPriceApi, PriceListScreen, PujaPrices, ServicePrices};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!("Starting price desk as {:?} against {}", config.role, config.api_url);
    let api = Arc::new(HttpPriceApi::new(&config)?);

    match config.role {
        Role::Serviceman => run(PriceListScreen::new(ServicePrices, api)).await?,
        Role::Brahman => run(PriceListScreen::new(PujaPrices, api)).await?,
    }

    info!("Shutting down");
    Ok(())
}

/// Prints `label` and reads one line. `None` once stdin is closed.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    read_command(&mut io::stdin().lock())
}

fn read_command<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

async fn run<S: PriceSlice>(mut screen: PriceListScreen<S>) -> Result<(), Box<dyn Error>> {
    let display = DisplayFormatter::new();
    let kind = screen.kind();

    println!("=== Price Desk: {} prices ===", kind);
    println!("Commands:");
    println!("  list          - Show your price list");
    println!("  add           - Add or update a price");
    println!("  edit <id>     - Edit a price");
    println!("  delete <id>   - Delete a price");
    println!("  refresh       - Reload the list");
    println!("  dismiss       - Clear the current error");
    println!("  exit          - Exit the program");

    // A failed load is recorded in the store and shown by `render`.
    let _ = screen.mount().await;
    println!("{}", screen.render());

    loop {
        let Some(input) = prompt("> ")? else {
            debug!("Input closed");
            screen.unmount();
            break;
        };
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");
        let id = parts.next().and_then(|s| s.parse::<i64>().ok());

        match (command, id) {
            ("exit", _) => {
                debug!("Received exit command");
                screen.unmount();
                break;
            }
            ("", _) => continue,
            ("list", _) => println!("{}", screen.render()),
            ("refresh", _) => {
                let _ = screen.refresh().await;
                println!("{}", screen.render());
            }
            ("dismiss", _) => {
                screen.dismiss_error();
                println!("{}", screen.render());
            }
            ("add", _) => {
                if let Err(rejected) = screen.open_add().await {
                    println!("{}", display.format_error(&rejected.message));
                }
                fill_form(&mut screen, &display).await?;
            }
            ("edit", Some(id)) => match screen.press(id, CardAction::Edit).await {
                ScreenEvent::EditorOpened { alert } => {
                    if let Some(message) = alert {
                        println!("{}", display.format_error(&message));
                    }
                    fill_form(&mut screen, &display).await?;
                }
                ScreenEvent::Alert { message } => println!("{}", display.format_error(&message)),
                ScreenEvent::Deleted { .. } => {}
            },
            ("delete", Some(id)) => {
                let answer = prompt(&format!("Delete {} price #{}? [y/N] ", kind, id))?;
                if !answer.is_some_and(|a| a.eq_ignore_ascii_case("y")) {
                    continue;
                }
                match screen.press(id, CardAction::Delete).await {
                    ScreenEvent::Deleted { message } => println!("{}", display.format_success(&message)),
                    ScreenEvent::Alert { message } => println!("{}", display.format_error(&message)),
                    ScreenEvent::EditorOpened { .. } => {}
                }
                println!("{}", screen.render());
            }
            ("edit" | "delete", None) => println!("Usage: {} <id>", command),
            (other, _) => println!("Unknown command: {}", other),
        }
    }

    Ok(())
}

/// Walks the user through the open form until it is saved or cancelled.
async fn fill_form<S: PriceSlice>(
    screen: &mut PriceListScreen<S>,
    display: &DisplayFormatter,
) -> Result<(), Box<dyn Error>> {
    let kind = screen.kind();

    loop {
        let form = screen.form();
        println!("{}", display.format_header(&format!("{} price", kind)));
        println!("{}", display.format_options(form.options()));
        if let Some(selected) = form.selected() {
            println!("Selected: {}", selected.label);
        } else if let Some(id) = form.selected_id() {
            println!("Selected: #{}", id);
        }
        if !form.price().is_empty() {
            println!("Price: {}", form.price());
        }
        if let Some(file) = form.material() {
            println!("Material: {}", file.upload_name());
        }

        let hint = if kind.supports_material() {
            "select <id> | price <amount> | pdf <path> | save | cancel"
        } else {
            "select <id> | price <amount> | save | cancel"
        };
        let Some(input) = prompt(&format!("[{hint}] "))? else {
            screen.close_form();
            return Ok(());
        };
        let (command, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));

        match command {
            "select" => match rest.trim().parse::<i64>() {
                Ok(id) => {
                    if let Err(e) = screen.form_mut().select(id) {
                        println!("{}", display.format_error(&e.to_string()));
                    }
                }
                Err(_) => println!("Usage: select <id>"),
            },
            "price" => {
                if let Err(e) = screen.form_mut().set_price(rest) {
                    println!("{}", display.format_error(&e.to_string()));
                }
            }
            "pdf" => match screen.form_mut().attach_material(&PathPicker::new(rest)) {
                Ok(true) => println!("Attached."),
                Ok(false) => println!("No file chosen."),
                Err(e) => println!("{}", display.format_error(&e.user_message("Could not pick file"))),
            },
            "save" => match screen.submit().await {
                SubmitOutcome::Saved { message } => {
                    println!("{}", display.format_success(&message));
                    println!("{}", screen.render());
                    return Ok(());
                }
                SubmitOutcome::Failed { message } => println!("{}", display.format_error(&message)),
                SubmitOutcome::Invalid(e) => println!("{}", display.format_error(&e.to_string())),
            },
            "cancel" => {
                screen.close_form();
                return Ok(());
            }
            _ => println!("Unknown form command"),
        }
    }
}
