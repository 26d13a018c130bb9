use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write, stdin, stdout};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::ExpenseService;
use crate::domain::{ExpenseFilter, format_cents, parse_cents, parse_expense_date};
use crate::weather::{ConditionKind, Units, WeatherClient, daily_series, format_unix_time};

/// Impensa - Expense Tracker
#[derive(Parser)]
#[command(name = "impensa")]
#[command(about = "A local-first expense tracker with budget alerts")]
#[command(version)]
pub struct Cli {
    /// Ledger CSV file path
    #[arg(short, long, default_value = "expenses_data.csv")]
    pub data: String,

    /// Budget file path
    #[arg(long, default_value = "budget.json")]
    pub budget_file: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an expense
    Add {
        /// Amount spent (e.g., "50.00" or "50")
        amount: String,

        /// Category label (e.g., "Food", "Transport")
        #[arg(short, long)]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Description of the expense
        #[arg(long)]
        description: Option<String>,
    },

    /// List expenses (optionally filtered)
    List {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by category (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
    },

    /// Delete an expense by its row id (as shown by `list`)
    Delete {
        /// Row id of the expense
        id: usize,
    },

    /// Month-wise spending summary
    Summary {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by category (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
    },

    /// Category-wise spending breakdown
    Categories {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Show only the top N categories (N defaults to 5)
        #[arg(short, long, num_args = 0..=1, default_missing_value = "5")]
        top: Option<usize>,
    },

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Import expenses from a CSV file
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Export the filtered expenses to CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by category (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
    },

    /// Current conditions and 5-day forecast for one or more cities
    Weather {
        /// City names, comma-separated (e.g., "Mumbai, Delhi")
        cities: String,

        /// Units: metric (Celsius) or imperial (Fahrenheit)
        #[arg(short, long, default_value = "metric")]
        units: String,

        /// OpenWeatherMap API key
        #[arg(long, env = "OPENWEATHER_API_KEY")]
        api_key: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly budget ceiling (0 disables alerts)
    Set {
        /// Budget amount (e.g., "400" or "400.00")
        amount: String,
    },

    /// Show the configured budget
    Show,

    /// Check monthly spending against the budget
    Status {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by category (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let data_path = self.data.clone();
        let budget_path = self.budget_file.clone();
        let verbose = self.verbose;

        match self.command {
            Commands::Weather {
                cities,
                units,
                api_key,
            } => {
                let units = Units::from_str(&units).with_context(|| {
                    format!("Invalid units '{}'. Use 'metric' or 'imperial'", units)
                })?;
                run_weather_command(&cities, units, &api_key)
            }

            Commands::Add {
                amount,
                category,
                date,
                description,
            } => {
                let mut service = ExpenseService::open(&data_path, &budget_path)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let date = match date {
                    Some(date_str) => parse_expense_date(&date_str).with_context(|| {
                        format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                    })?,
                    None => Utc::now().date_naive(),
                };

                let expense = service.add_expense(
                    date,
                    category,
                    amount_cents,
                    description.unwrap_or_default(),
                )?;

                println!(
                    "Added expense: {} {} ({})",
                    format_cents(expense.amount_cents),
                    expense.category,
                    expense.date.format("%Y-%m-%d")
                );
                if verbose {
                    eprintln!("Ledger written to {}", data_path);
                }
                Ok(())
            }

            Commands::List { from, to, category } => {
                let service = ExpenseService::open(&data_path, &budget_path)?;
                let filter = build_filter(from.as_deref(), to.as_deref(), category)?;
                run_list_command(&service, &filter)
            }

            Commands::Delete { id } => {
                let mut service = ExpenseService::open(&data_path, &budget_path)?;
                match service.delete_expense(id)? {
                    Some(expense) => println!(
                        "Deleted expense {}: {} {} ({})",
                        id,
                        format_cents(expense.amount_cents),
                        expense.category,
                        expense.date.format("%Y-%m-%d")
                    ),
                    None => println!("No expense with id {}. Nothing deleted.", id),
                }
                Ok(())
            }

            Commands::Summary { from, to, category } => {
                let service = ExpenseService::open(&data_path, &budget_path)?;
                let filter = build_filter(from.as_deref(), to.as_deref(), category)?;
                run_summary_command(&service, &filter)
            }

            Commands::Categories { from, to, top } => {
                let service = ExpenseService::open(&data_path, &budget_path)?;
                let filter = build_filter(from.as_deref(), to.as_deref(), Vec::new())?;
                run_categories_command(&service, &filter, top)
            }

            Commands::Budget(budget_cmd) => {
                let mut service = ExpenseService::open(&data_path, &budget_path)?;
                run_budget_command(&mut service, budget_cmd)
            }

            Commands::Import { input } => {
                let mut service = ExpenseService::open(&data_path, &budget_path)?;
                run_import_command(&mut service, input.as_deref())
            }

            Commands::Export {
                output,
                from,
                to,
                category,
            } => {
                let service = ExpenseService::open(&data_path, &budget_path)?;
                let filter = build_filter(from.as_deref(), to.as_deref(), category)?;
                run_export_command(&service, &filter, output.as_deref())
            }
        }
    }
}

fn build_filter(
    from: Option<&str>,
    to: Option<&str>,
    categories: Vec<String>,
) -> Result<ExpenseFilter> {
    Ok(ExpenseFilter {
        from: from.map(parse_date).transpose()?,
        to: to.map(parse_date).transpose()?,
        categories: categories.into_iter().collect::<HashSet<String>>(),
    })
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    parse_expense_date(date_str)
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn run_list_command(service: &ExpenseService, filter: &ExpenseFilter) -> Result<()> {
    if service.is_empty() {
        println!("No expenses recorded yet. Add one or import a CSV file.");
        return Ok(());
    }

    let entries = service.list_expenses(filter);
    if entries.is_empty() {
        println!("No expenses match the given filters.");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<20} {:>12}  {}",
        "ID", "DATE", "CATEGORY", "AMOUNT", "DESCRIPTION"
    );
    println!("{}", "-".repeat(80));
    for entry in &entries {
        let expense = &entry.expense;
        println!(
            "{:<6} {:<12} {:<20} {:>12}  {}",
            entry.index,
            expense.date.format("%Y-%m-%d"),
            truncate(&expense.category, 20),
            format_cents(expense.amount_cents),
            expense.description
        );
    }
    println!("{}", "-".repeat(80));
    println!(
        "{} expense(s), total {}",
        entries.len(),
        format_cents(service.total(filter))
    );
    Ok(())
}

fn run_summary_command(service: &ExpenseService, filter: &ExpenseFilter) -> Result<()> {
    let summary = service.monthly_summary(filter);
    if summary.is_empty() {
        println!("No expenses to summarize.");
        return Ok(());
    }

    println!("{:<10} {:>12}", "MONTH", "AMOUNT");
    println!("{}", "-".repeat(24));
    for (month, spent) in &summary {
        println!("{:<10} {:>12}", month.to_string(), format_cents(*spent));
    }
    println!("{}", "-".repeat(24));
    println!(
        "{:<10} {:>12}",
        "TOTAL",
        format_cents(summary.values().sum())
    );
    Ok(())
}

fn run_categories_command(
    service: &ExpenseService,
    filter: &ExpenseFilter,
    top: Option<usize>,
) -> Result<()> {
    let ranked = service.top_categories(filter, top.unwrap_or(usize::MAX));
    if ranked.is_empty() {
        println!("No expenses to summarize.");
        return Ok(());
    }

    let grand_total: i64 = ranked.iter().map(|(_, spent)| spent).sum();
    if let Some(n) = top {
        println!("Top {} spending categories:", n);
    }
    println!("{:<20} {:>12} {:>8}", "CATEGORY", "AMOUNT", "SHARE");
    println!("{}", "-".repeat(42));
    for (category, spent) in &ranked {
        let share = if grand_total > 0 {
            *spent as f64 * 100.0 / grand_total as f64
        } else {
            0.0
        };
        println!(
            "{:<20} {:>12} {:>7.1}%",
            truncate(category, 20),
            format_cents(*spent),
            share
        );
    }
    Ok(())
}

fn run_budget_command(service: &mut ExpenseService, command: BudgetCommands) -> Result<()> {
    match command {
        BudgetCommands::Set { amount } => {
            let budget_cents =
                parse_cents(&amount).context("Invalid amount format. Use '400.00' or '400'")?;
            service.set_budget(budget_cents)?;
            if budget_cents == 0 {
                println!("Budget cleared. Alerts disabled.");
            } else {
                println!("Budget saved: {}", format_cents(budget_cents));
            }
        }

        BudgetCommands::Show => {
            let budget = service.budget();
            if budget == 0 {
                println!("No budget set. Alerts are disabled.");
            } else {
                println!("Monthly budget: {}", format_cents(budget));
            }
        }

        BudgetCommands::Status { from, to, category } => {
            let filter = build_filter(from.as_deref(), to.as_deref(), category)?;
            let report = service.budget_report(&filter);

            if report.monthly.is_empty() {
                println!("No expenses to check against the budget.");
                return Ok(());
            }

            println!("{:<10} {:>12} {:<6}", "MONTH", "AMOUNT", "");
            println!("{}", "-".repeat(30));
            for (month, spent) in &report.monthly {
                let marker = if report.exceeded.contains(month) {
                    "OVER"
                } else {
                    ""
                };
                println!(
                    "{:<10} {:>12} {:<6}",
                    month.to_string(),
                    format_cents(*spent),
                    marker
                );
            }
            println!("{}", "-".repeat(30));

            if report.budget_cents == 0 {
                println!("No budget set. Alerts are disabled.");
            } else if report.exceeded.is_empty() {
                println!(
                    "All months are within the {} budget.",
                    format_cents(report.budget_cents)
                );
            } else {
                let months: Vec<String> =
                    report.exceeded.iter().map(|m| m.to_string()).collect();
                println!(
                    "Budget of {} exceeded in: {}",
                    format_cents(report.budget_cents),
                    months.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn run_import_command(service: &mut ExpenseService, input: Option<&str>) -> Result<()> {
    use crate::io::Importer;

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = Importer::new(service).import_expenses_csv(reader)?;
    println!("Imported {} expense(s).", result.imported);
    if result.dropped > 0 {
        println!(
            "Dropped {} row(s) with unparseable dates or amounts.",
            result.dropped
        );
    }
    Ok(())
}

fn run_export_command(
    service: &ExpenseService,
    filter: &ExpenseFilter,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = Exporter::new(service).export_expenses_csv(writer, filter)?;
    if output.is_some() {
        eprintln!("Exported {} expense(s)", count);
    }
    Ok(())
}

fn run_weather_command(cities: &str, units: Units, api_key: &str) -> Result<()> {
    let client = WeatherClient::new(api_key);

    for city in cities.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        println!("{}", "=".repeat(60));

        let Some(weather) = client.current(city, units)? else {
            println!("City '{}' not found. Please check spelling.", city);
            continue;
        };

        let condition = ConditionKind::from_description(weather.description());
        println!(
            "{}, {}  {} {}",
            weather.name,
            weather.sys.country,
            condition.icon(),
            weather.description()
        );
        println!(
            "  Temperature: {:.1}{}",
            weather.main.temp,
            units.temperature_suffix()
        );
        println!("  Humidity:    {:.0}%", weather.main.humidity);
        println!("  Sunrise:     {} UTC", format_unix_time(weather.sys.sunrise));
        println!("  Sunset:      {} UTC", format_unix_time(weather.sys.sunset));

        if let Some(forecast) = client.forecast(city, units)? {
            let series = daily_series(&forecast);
            if !series.is_empty() {
                println!();
                println!("  5-day forecast:");
                for point in series {
                    println!(
                        "    {}  {:>6.1}{}",
                        point.date,
                        point.temp,
                        units.temperature_suffix()
                    );
                }
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    // Walk back to a char boundary so multibyte labels never split mid-char
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_strings_unchanged() {
        assert_eq!(truncate("Food", 20), "Food");
        assert_eq!(truncate("", 20), "");
    }

    #[test]
    fn test_truncate_long_ascii() {
        assert_eq!(truncate("a-very-long-category-name", 20), "a-very-long-categ...");
    }

    #[test]
    fn test_truncate_multibyte_labels() {
        let label = "Déjeuner-et-café-extra";
        let cut = truncate(label, 20);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 20);

        // Cut point lands inside the 'é' byte sequence; must back off, not panic
        assert_eq!(truncate("ééééééééééé", 20), "éééééééé...");
    }
}
