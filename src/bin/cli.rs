use course_planner::{
    Course, CourseForm, CourseId, Planner, PlannerConfig, SqliteCourseStore,
    course::parse_course_label, form::course_choices,
};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type CliPlanner = Planner<SqliteCourseStore>;

/// Parses `1,2,3`, returning the first token that is not an id on failure.
fn parse_id_list(s: &str) -> Result<Vec<CourseId>, String> {
    s.split(',')
        .map(|p| p.trim().parse::<CourseId>().map_err(|_| p.trim().to_string()))
        .collect()
}

fn join_ids<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn render_courses_as_text_table(courses: &[Course]) -> String {
    let headers = ["id", "name", "credits", "periods", "requirements"];
    let rows: Vec<[String; 5]> = courses
        .iter()
        .map(|c| {
            [
                c.id.to_string(),
                c.name.clone(),
                c.credits.to_string(),
                join_ids(&c.periods),
                join_ids(&c.requirements),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[&str]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  list                               List all courses\n  show <id>                          Show one course\n  new                                Start a blank course form\n  select <id>                        Load a course into the form\n  form                               Show the form\n  name <text...>                     Set the course name\n  credits <n>                        Set credits (0-20)\n  period <n>                         Toggle offering period (1-4)\n  require <id>                       Add a prerequisite\n  unrequire <id>                     Remove a prerequisite\n  save                               Save the form\n  delete [id]                        Delete the given or selected course\n  clear-all                          Delete every course\n  total <ids_csv> [all]              Sum credits (all = include prerequisites)\n  order                              Show study order by prerequisite level\n  periods                            Show courses offered per period\n  view <courses|calculator|schedule> Switch view\n  export <json|csv> <path>           Write the catalog to a file\n  import <json|csv> <path>           Read courses from a file\n  quit|exit                          Exit"
    );
}

fn print_form(form: &CourseForm) {
    let selected = form
        .selected()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(new)".to_string());
    println!("Course       : {}", selected);
    println!("Name         : {}", form.name());
    println!("Credits      : {}", form.credits());
    println!("Periods      : {}", join_ids(form.periods()));
    println!("Requirements : {}", join_ids(form.requirements()));
}

fn print_course_list(planner: &CliPlanner) {
    match planner.get_all_courses() {
        Ok(courses) => println!("{}", render_courses_as_text_table(&courses)),
        Err(e) => println!("Error: {}", e),
    }
}

fn print_study_order(planner: &CliPlanner) {
    match planner.study_order() {
        Ok(layers) if layers.is_empty() => println!("No courses."),
        Ok(layers) => {
            for (level, courses) in layers.iter().enumerate() {
                let labels = course_choices(courses).join(", ");
                println!("Level {}: {}", level + 1, labels);
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn print_courses_by_period(planner: &CliPlanner) {
    match planner.courses_by_period() {
        Ok(by_period) => {
            for (period, courses) in &by_period {
                let labels = course_choices(courses).join(", ");
                println!("Period {}: {}", period, labels);
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn parse_id_arg(arg: Option<&str>, usage: &str) -> Option<CourseId> {
    match arg.map(parse_course_label) {
        Some(Some(id)) => Some(id),
        Some(None) => {
            println!("Invalid id");
            None
        }
        None => {
            println!("Usage: {}", usage);
            None
        }
    }
}

fn open_store(config: &PlannerConfig) -> Result<SqliteCourseStore, Box<dyn std::error::Error>> {
    if config.is_in_memory() {
        return Ok(SqliteCourseStore::open_in_memory()?);
    }
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(SqliteCourseStore::open(&config.database_path)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PlannerConfig::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();

    info!(database_path = %config.database_path.display(), "opening course store");
    let mut planner = Planner::new(open_store(&config)?);
    let mut form = CourseForm::new();

    println!("Course Planner (CLI) - type 'help' for commands\n");
    print_course_list(&planner);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = input
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((input, ""));
        let mut parts = rest.split_whitespace();

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" => print_course_list(&planner),
            "show" => {
                let Some(id) = parse_id_arg(parts.next(), "show <id>") else {
                    continue;
                };
                match planner.get_course(id) {
                    Ok(Some(course)) => {
                        println!("{}", render_courses_as_text_table(std::slice::from_ref(&course)))
                    }
                    Ok(None) => println!("Course {id} not found."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "new" => {
                form.clear();
                println!("Started a new course form.");
            }
            "select" => {
                let Some(id) = parse_id_arg(parts.next(), "select <id>") else {
                    continue;
                };
                match planner.get_course(id) {
                    Ok(Some(course)) => {
                        form.fill_from(&course);
                        println!("Selected {}.", course);
                        print_form(&form);
                    }
                    Ok(None) => println!("Course {id} not found."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "form" => print_form(&form),
            "name" => {
                if rest.is_empty() {
                    println!("Usage: name <text...>");
                    continue;
                }
                form.set_name(rest);
                println!("Name set.");
            }
            "credits" => match parts.next().map(str::parse::<u32>) {
                Some(Ok(credits)) => match form.set_credits(credits) {
                    Ok(()) => println!("Credits set."),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(_)) => println!("Invalid credits"),
                None => println!("Usage: credits <n>"),
            },
            "period" => match parts.next().map(str::parse::<u8>) {
                Some(Ok(period)) => match form.toggle_period(period) {
                    Ok(true) => println!("Period {period} selected."),
                    Ok(false) => println!("Period {period} cleared."),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(_)) => println!("Invalid period"),
                None => println!("Usage: period <n>"),
            },
            "require" => {
                let Some(id) = parse_id_arg(parts.next(), "require <id>") else {
                    continue;
                };
                match planner.get_course(id) {
                    Ok(Some(course)) => match form.add_requirement(id) {
                        Ok(()) => println!("Requirement {} added.", course),
                        Err(e) => println!("Error: {}", e),
                    },
                    Ok(None) => println!("Course {id} not found."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "unrequire" => {
                let Some(id) = parse_id_arg(parts.next(), "unrequire <id>") else {
                    continue;
                };
                if form.remove_requirement(id) {
                    println!("Requirement {id} removed.");
                } else {
                    println!("Requirement {id} not in form.");
                }
            }
            "save" => match planner.save_course(form.to_course()) {
                Ok(course) => {
                    form.fill_from(&course);
                    println!("Saved {}.", course);
                }
                Err(e) => println!("Error: {}", e),
            },
            "delete" => {
                let id = match parts.next() {
                    arg @ Some(_) => match parse_id_arg(arg, "delete [id]") {
                        Some(id) => id,
                        None => continue,
                    },
                    None => match form.selected() {
                        Some(id) => id,
                        None => {
                            println!("Usage: delete [id] (no course selected)");
                            continue;
                        }
                    },
                };
                if let Ok(dependents) = planner.dependents_of(id) {
                    if !dependents.is_empty() {
                        println!("Note: course {id} was required by {}.", join_ids(&dependents));
                    }
                }
                match planner.delete_course(id) {
                    Ok(()) => {
                        if form.selected() == Some(id) {
                            form.clear();
                        }
                        println!("Deleted course {id}.");
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "clear-all" => match planner.delete_all() {
                Ok(()) => {
                    form.clear();
                    println!("Deleted all courses.");
                }
                Err(e) => println!("Error: {}", e),
            },
            "total" => {
                let Some(ids_s) = parts.next() else {
                    println!("Usage: total <ids_csv> [all]");
                    continue;
                };
                let include_prerequisites = parts.next() == Some("all");
                let ids = match parse_id_list(ids_s) {
                    Ok(ids) => ids,
                    Err(token) => {
                        println!("Invalid id '{}'", token);
                        continue;
                    }
                };
                match planner.credit_total(&ids, include_prerequisites) {
                    Ok(summary) => println!("Total: {}", summary.to_cli_summary()),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "order" => print_study_order(&planner),
            "periods" => print_courses_by_period(&planner),
            "view" => match parts.next() {
                Some("courses") => {
                    print_course_list(&planner);
                    print_form(&form);
                }
                Some("calculator") => {
                    println!("Calculator: use 'total <ids_csv> [all]' to sum credits.");
                }
                Some("schedule") => {
                    print_study_order(&planner);
                    print_courses_by_period(&planner);
                }
                _ => println!("Usage: view <courses|calculator|schedule>"),
            },
            "export" | "import" => {
                let format = parts.next();
                let path = parts.next();
                let (Some(format), Some(path)) = (format, path) else {
                    println!("Usage: {} <json|csv> <path>", cmd);
                    continue;
                };
                let result = match (cmd, format) {
                    ("export", "json") => planner.export_json(path),
                    ("export", "csv") => planner.export_csv(path),
                    ("import", "json") => planner.import_json(path),
                    ("import", "csv") => planner.import_csv(path),
                    _ => {
                        println!("Unknown format '{}' (expected json or csv)", format);
                        continue;
                    }
                };
                match result {
                    Ok(count) if cmd == "export" => println!("Exported {count} courses to {path}."),
                    Ok(count) => println!("Imported {count} courses from {path}."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    Ok(())
}

