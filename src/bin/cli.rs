use std::io::{self, Write};
use std::path::Path;

use chrono::NaiveDate;
use class_schedule::{
    ClassCatalog, ClassKind, EndType, Frequency, ScheduleForm, ScheduledClass, Settings,
    Timetable, ValidationErrors,
    persistence::{
        load_catalog_from_csv, load_catalog_from_json, save_catalog_to_csv, save_catalog_to_json,
    },
    rule::DATE_FORMAT,
    telemetry,
};

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: Vec<&str>| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers.to_vec()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_catalog(catalog: &ClassCatalog) -> String {
    let rows: Vec<Vec<String>> = catalog
        .classes()
        .iter()
        .map(|class| {
            vec![
                class.id.to_string(),
                class.name.clone(),
                class.kind.to_string(),
                class.instructor.clone().unwrap_or_default(),
                class
                    .capacity
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                class
                    .primary_event()
                    .map(|rule| rule.summary().to_cli_summary())
                    .unwrap_or_else(|| "not scheduled".to_string()),
            ]
        })
        .collect();
    render_text_table(
        &["id", "name", "kind", "instructor", "capacity", "schedule"],
        &rows,
    )
}

fn render_timetable(timetable: &Timetable) -> String {
    let rows: Vec<Vec<String>> = timetable
        .entries()
        .iter()
        .map(|entry| {
            let occ = &entry.occurrence;
            vec![
                occ.date.format(DATE_FORMAT).to_string(),
                occ.day_of_week.to_string(),
                format!(
                    "{}–{}",
                    occ.start_time.format("%H:%M"),
                    occ.end_time.format("%H:%M")
                ),
                entry.class_id.to_string(),
                entry.class_name.clone(),
            ]
        })
        .collect();
    render_text_table(&["date", "day", "time", "id", "class"], &rows)
}

fn print_validation_errors(errors: &ValidationErrors) {
    println!("Schedule has {} problem(s):", errors.len());
    for err in errors {
        println!("  {err}");
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  classes                            List classes and their schedules\n  add <id> <name...>                 Add a class\n  new <name...>                      Add a class with the next id and edit it\n  event <id> <name...>               Add a standalone event\n  instructor <id> <name...>          Set a class instructor\n  capacity <id> <n>                  Set a class capacity\n  delete <id>                        Remove a class\n  edit <id>                          Open the schedule form for a class\n  freq <hourly|daily|weekly|monthly|yearly>\n                                     Switch frequency (resets selections)\n  start <YYYY-MM-DD[ HH:mm]>         Set start\n  end <YYYY-MM-DD[ HH:mm]>           Set end date\n  endtype <on|never>                 Set how the schedule ends\n  week <1|2|3|4|-1>                  Toggle a week of the month\n  month <0-11>                       Toggle a month (0 = January)\n  slot add <day> <HH:mm> <HH:mm>     Add a weekday time slot\n  slot rm <index>                    Remove a weekday time slot\n  title <text...>                    Set the event title\n  desc <text...>                     Set the event description\n  color <#fg> <#bg>                  Set colors\n  form                               Show the open form as JSON\n  summary                            Summarize the open form\n  validate                           Validate the open form\n  submit                             Save the form into its class\n  cancel                             Discard the open form\n  occurrences <id> <from> <to>       List sessions of a class\n  timetable <from> <to>              List sessions of every class\n  save <json|csv> <path>             Save the catalog\n  load <json|csv> <path>             Load a catalog\n  quit|exit                          Exit"
    );
}

fn rest_of_line<'a>(parts: impl Iterator<Item = &'a str>) -> Option<String> {
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn load_catalog(path: &Path) -> Result<ClassCatalog, class_schedule::PersistenceError> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_catalog_from_csv(path)
    } else {
        load_catalog_from_json(path)
    }
}

fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Ignoring invalid settings: {e}");
            Settings::default()
        }
    };
    telemetry::init(&settings.log.level);

    let mut catalog = match settings.storage.path.as_deref() {
        Some(path) if path.exists() => match load_catalog(path) {
            Ok(loaded) => {
                println!("Catalog loaded from {}.", path.display());
                loaded
            }
            Err(e) => {
                println!("Error loading catalog: {e}");
                ClassCatalog::new()
            }
        },
        _ => ClassCatalog::new(),
    };
    // The class being edited and its form.
    let mut session: Option<(u32, ScheduleForm)> = None;

    println!("Class Schedule (CLI) - type 'help' for commands\n");
    println!("{}", render_catalog(&catalog));

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

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "classes" | "show" => println!("{}", render_catalog(&catalog)),
            "add" | "event" => {
                let id_s = parts.next();
                let name = rest_of_line(parts);
                match (id_s, name) {
                    (Some(id_s), Some(name)) => {
                        let id: u32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let mut class = ScheduledClass::new(id, name);
                        if cmd == "event" {
                            class.kind = ClassKind::Event;
                        }
                        match catalog.insert(class) {
                            Ok(()) => {
                                println!("Added {cmd} {id}.");
                                println!("{}", render_catalog(&catalog));
                            }
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => println!("Usage: {cmd} <id> <name...>"),
                }
            }
            "new" => match rest_of_line(parts) {
                Some(name) => {
                    let added = catalog.next_id().and_then(|id| {
                        let class = ScheduledClass::new(id, name);
                        let form = ScheduleForm::edit(&class);
                        catalog.insert(class).map(|()| (id, form))
                    });
                    match added {
                        Ok((id, form)) => {
                            println!("Added class {id}. Editing its schedule: {}", form.summary());
                            session = Some((id, form));
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                None => println!("Usage: new <name...>"),
            },
            "instructor" | "capacity" => {
                let id_s = parts.next();
                let value = rest_of_line(parts);
                let (Some(id_s), Some(value)) = (id_s, value) else {
                    println!("Usage: {cmd} <id> <value>");
                    continue;
                };
                let Ok(id) = id_s.parse::<u32>() else {
                    println!("Invalid id");
                    continue;
                };
                let Some(existing) = catalog.get(id) else {
                    println!("Class {id} not found.");
                    continue;
                };
                let mut class = existing.clone();
                if cmd == "instructor" {
                    class.instructor = Some(value);
                } else {
                    match value.parse::<u32>() {
                        Ok(n) => class.capacity = Some(n),
                        Err(_) => {
                            println!("Invalid capacity");
                            continue;
                        }
                    }
                }
                match catalog.upsert(class) {
                    Ok(_) => println!("{cmd} set.\n{}", render_catalog(&catalog)),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "delete" => match parts.next() {
                Some(id_s) => match id_s.parse::<u32>() {
                    Ok(id) => match catalog.remove(id) {
                        Ok(_) => {
                            if session.as_ref().is_some_and(|(open, _)| *open == id) {
                                session = None;
                            }
                            println!("Deleted class {id}.");
                            println!("{}", render_catalog(&catalog));
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(_) => println!("Invalid id"),
                },
                None => println!("Usage: delete <id>"),
            },
            "edit" => match parts.next().map(str::parse::<u32>) {
                Some(Ok(id)) => match catalog.get(id) {
                    Some(class) => {
                        let form = ScheduleForm::edit(class);
                        println!("Editing schedule of class {id}: {}", form.summary());
                        session = Some((id, form));
                    }
                    None => println!("Class {id} not found."),
                },
                Some(Err(_)) => println!("Invalid id"),
                None => println!("Usage: edit <id>"),
            },
            "freq" | "start" | "end" | "endtype" | "week" | "month" | "slot" | "title"
            | "desc" | "color" | "form" | "summary" | "validate" => {
                let Some((_, form)) = session.as_mut() else {
                    println!("No open form. Use 'edit <id>' first.");
                    continue;
                };
                match cmd {
                    "freq" => match parts.next().map(str::parse::<Frequency>) {
                        Some(Ok(frequency)) => {
                            form.set_frequency(frequency);
                            println!("Frequency set. {}", form.summary());
                        }
                        Some(Err(e)) => println!("Error: {e}"),
                        None => println!("Usage: freq <hourly|daily|weekly|monthly|yearly>"),
                    },
                    "start" | "end" => match rest_of_line(parts) {
                        Some(value) => {
                            if cmd == "start" {
                                form.set_start(value);
                            } else {
                                form.set_end(value);
                            }
                            println!("{cmd} set. {}", form.summary());
                        }
                        None => println!("Usage: {cmd} <YYYY-MM-DD[ HH:mm]>"),
                    },
                    "endtype" => match parts.next().map(str::parse::<EndType>) {
                        Some(Ok(end_type)) => {
                            form.set_end_type(end_type);
                            println!("End type set. {}", form.summary());
                        }
                        Some(Err(e)) => println!("Error: {e}"),
                        None => println!("Usage: endtype <on|never>"),
                    },
                    "week" | "month" => match parts.next().map(str::parse::<i32>) {
                        Some(Ok(value)) => {
                            let toggled = if cmd == "week" {
                                form.toggle_week_number(value)
                            } else {
                                form.toggle_month(value)
                            };
                            match toggled {
                                Ok(true) => println!("Selected {cmd} {value}. {}", form.summary()),
                                Ok(false) => {
                                    println!("Deselected {cmd} {value}. {}", form.summary())
                                }
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        Some(Err(_)) => println!("Invalid number"),
                        None => println!("Usage: {cmd} <number>"),
                    },
                    "slot" => match (parts.next(), parts.next(), parts.next(), parts.next()) {
                        (Some("add"), Some(day), Some(start), Some(end)) => {
                            let index = form.add_weekday_slot(day, start, end);
                            println!("Added slot {index}. {}", form.summary());
                        }
                        (Some("rm"), Some(index_s), None, None) => {
                            let Ok(index) = index_s.parse::<usize>() else {
                                println!("Invalid index");
                                continue;
                            };
                            match form.remove_weekday_slot(index) {
                                Ok(_) => println!("Removed slot {index}. {}", form.summary()),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        _ => println!("Usage: slot add <day> <HH:mm> <HH:mm> | slot rm <index>"),
                    },
                    "title" | "desc" => match rest_of_line(parts) {
                        Some(text) => {
                            if cmd == "title" {
                                form.set_title(text);
                            } else {
                                form.set_description(text);
                            }
                            println!("{cmd} set.");
                        }
                        None => println!("Usage: {cmd} <text...>"),
                    },
                    "color" => match (parts.next(), parts.next()) {
                        (Some(fg), Some(bg)) => {
                            form.set_colors(fg, bg);
                            println!("Colors set.");
                        }
                        _ => println!("Usage: color <#fg> <#bg>"),
                    },
                    "form" => match serde_json::to_string_pretty(form.rule()) {
                        Ok(json) => println!("{json}"),
                        Err(e) => println!("Error: {e}"),
                    },
                    "summary" => println!("{}", form.summary()),
                    _ => match form.validate() {
                        Ok(rule) => println!("Schedule is valid: {}", rule.summary()),
                        Err(errors) => print_validation_errors(&errors),
                    },
                }
            }
            "submit" => {
                let Some((class_id, form)) = session.as_ref() else {
                    println!("No open form. Use 'edit <id>' first.");
                    continue;
                };
                let class_id = *class_id;
                let Some(class) = catalog.get_mut(class_id) else {
                    println!("Class {class_id} not found.");
                    session = None;
                    continue;
                };
                match form.submit(class) {
                    Ok(rule) => {
                        println!("Schedule saved for class {class_id}: {}", rule.summary());
                        session = None;
                    }
                    Err(errors) => print_validation_errors(&errors),
                }
            }
            "cancel" => match session.take() {
                Some((class_id, form)) => {
                    form.cancel();
                    println!("Discarded changes to class {class_id}.");
                }
                None => println!("No open form."),
            },
            "occurrences" => {
                let args = (parts.next(), parts.next(), parts.next());
                let (Some(id_s), Some(from_s), Some(to_s)) = args else {
                    println!("Usage: occurrences <id> <YYYY-MM-DD> <YYYY-MM-DD>");
                    continue;
                };
                let (Ok(id), Some(from), Some(to)) =
                    (id_s.parse::<u32>(), parse_date(from_s), parse_date(to_s))
                else {
                    println!("Invalid id or date (YYYY-MM-DD)");
                    continue;
                };
                let Some(class) = catalog.get(id) else {
                    println!("Class {id} not found.");
                    continue;
                };
                let Some(rule) = class.primary_event() else {
                    println!("Class {id} has no schedule.");
                    continue;
                };
                match rule.occurrences(from, to) {
                    Ok(found) => {
                        println!("{} session(s):", found.len());
                        for occ in found {
                            println!(
                                "  {} {} {}–{}",
                                occ.date.format(DATE_FORMAT),
                                occ.day_of_week,
                                occ.start_time.format("%H:%M"),
                                occ.end_time.format("%H:%M")
                            );
                        }
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "timetable" => {
                let (Some(from), Some(to)) = (
                    parts.next().and_then(parse_date),
                    parts.next().and_then(parse_date),
                ) else {
                    println!("Usage: timetable <YYYY-MM-DD> <YYYY-MM-DD>");
                    continue;
                };
                match Timetable::build(&catalog, from, to) {
                    Ok(timetable) => println!("{}", render_timetable(&timetable)),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                let saved = match (fmt, path) {
                    (Some("json"), Some(path)) => Some((path, save_catalog_to_json(&catalog, path))),
                    (Some("csv"), Some(path)) => Some((path, save_catalog_to_csv(&catalog, path))),
                    _ => None,
                };
                match saved {
                    Some((path, Ok(()))) => println!("Catalog saved to {path}."),
                    Some((_, Err(e))) => println!("Error saving catalog: {e}"),
                    None => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                let loaded = match (fmt, path) {
                    (Some("json"), Some(path)) => Some((path, load_catalog_from_json(path))),
                    (Some("csv"), Some(path)) => Some((path, load_catalog_from_csv(path))),
                    _ => None,
                };
                match loaded {
                    Some((path, Ok(next))) => {
                        catalog = next;
                        session = None;
                        println!("Catalog loaded from {path}.");
                        println!("{}", render_catalog(&catalog));
                    }
                    Some((_, Err(e))) => println!("Error loading catalog: {e}"),
                    None => println!("Usage: load <json|csv> <path>"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
