//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use folio_core::{CollegeId, EssayId, EssayStatus, PromptId, ValueId};
use std::path::PathBuf;

fn id_arg<T>(name: &'static str, help: &'static str) -> Arg
where
    T: std::str::FromStr + Clone + Send + Sync + 'static,
    <T as std::str::FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    Arg::new(name)
        .required(true)
        .value_parser(|s: &str| s.parse::<T>())
        .help(help)
}

fn text_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).required(true).help(help)
}

/// Build the `folio` command
pub fn build() -> Command {
    Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Essay portfolio: colleges, prompts, essay branches and value tags")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Settings TOML file"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON data file (default: folio.json)"),
        )
        .arg(
            Arg::new("student")
                .long("student")
                .global(true)
                .help("Student scope key"),
        )
        .subcommand(college_command())
        .subcommand(prompt_command())
        .subcommand(
            Command::new("idea")
                .about("Create a new idea")
                .arg(text_arg("title", "Idea title"))
                .arg(Arg::new("text").default_value("").help("Idea text"))
                .arg(
                    Arg::new("common-app")
                        .long("common-app")
                        .action(ArgAction::SetTrue)
                        .help("Create a Common App essay instead of a base essay"),
                )
                .arg(
                    Arg::new("prompt-text")
                        .long("prompt-text")
                        .help("Prompt text the idea was written for"),
                ),
        )
        .subcommand(
            Command::new("suggest")
                .about("Suggest essay angles from activities and honors")
                .arg(text_arg("prompt-text", "Prompt to brainstorm for"))
                .arg(
                    Arg::new("activity")
                        .long("activity")
                        .action(ArgAction::Append)
                        .help("Activity as NAME or NAME:ROLE"),
                )
                .arg(
                    Arg::new("honor")
                        .long("honor")
                        .action(ArgAction::Append)
                        .help("Honor title"),
                )
                .arg(
                    Arg::new("pick")
                        .long("pick")
                        .value_parser(value_parser!(usize))
                        .help("Create an idea from the Nth suggestion (1-based)"),
                )
                .arg(
                    Arg::new("common-app")
                        .long("common-app")
                        .action(ArgAction::SetTrue)
                        .requires("pick")
                        .help("Picked idea becomes a Common App essay"),
                ),
        )
        .subcommand(essay_command())
        .subcommand(value_command())
        .subcommand(
            Command::new("coverage")
                .about("Values covered per college")
                .arg(
                    Arg::new("college")
                        .value_parser(|s: &str| s.parse::<CollegeId>())
                        .help("Only this college, with missing values"),
                ),
        )
        .subcommand(Command::new("audit").about("Report dangling references and diverged branches"))
}

fn college_command() -> Command {
    Command::new("college")
        .about("Manage colleges")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a college")
                .arg(text_arg("name", "College name")),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a college")
                .arg(id_arg::<CollegeId>("id", "College id"))
                .arg(text_arg("name", "New name")),
        )
        .subcommand(Command::new("list").about("List colleges"))
}

fn prompt_command() -> Command {
    Command::new("prompt")
        .about("Manage prompts")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a prompt to a college")
                .arg(id_arg::<CollegeId>("college", "College id"))
                .arg(text_arg("text", "Prompt text"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(u32))
                        .help("Word limit"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a prompt (the linked essay is kept)")
                .arg(id_arg::<PromptId>("id", "Prompt id")),
        )
        .subcommand(
            Command::new("text")
                .about("Replace prompt text")
                .arg(id_arg::<PromptId>("id", "Prompt id"))
                .arg(text_arg("text", "New text")),
        )
        .subcommand(
            Command::new("limit")
                .about("Set the word limit; omit to clear")
                .arg(id_arg::<PromptId>("id", "Prompt id"))
                .arg(Arg::new("limit").value_parser(value_parser!(u32))),
        )
        .subcommand(
            Command::new("list")
                .about("List prompts")
                .arg(
                    Arg::new("college")
                        .value_parser(|s: &str| s.parse::<CollegeId>())
                        .help("Only prompts of this college"),
                ),
        )
}

fn essay_command() -> Command {
    Command::new("essay")
        .about("Manage essays")
        .subcommand_required(true)
        .subcommand(
            Command::new("show")
                .about("Show one essay")
                .arg(id_arg::<EssayId>("id", "Essay id")),
        )
        .subcommand(Command::new("list").about("List essays"))
        .subcommand(
            Command::new("branch")
                .about("Fork a base essay for a prompt")
                .arg(id_arg::<PromptId>("prompt", "Prompt id"))
                .arg(id_arg::<EssayId>("base", "Base essay id")),
        )
        .subcommand(
            Command::new("custom")
                .about("Write a new essay from scratch for a prompt")
                .arg(id_arg::<PromptId>("prompt", "Prompt id")),
        )
        .subcommand(
            Command::new("link")
                .about("Link an existing essay to a prompt")
                .arg(id_arg::<PromptId>("prompt", "Prompt id"))
                .arg(id_arg::<EssayId>("essay", "Essay id")),
        )
        .subcommand(
            Command::new("unlink")
                .about("Unlink a prompt's essay (forked branches are deleted)")
                .arg(id_arg::<PromptId>("prompt", "Prompt id")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an essay")
                .arg(id_arg::<EssayId>("id", "Essay id")),
        )
        .subcommand(
            Command::new("status")
                .about("Set drafting status")
                .arg(id_arg::<EssayId>("id", "Essay id"))
                .arg(
                    Arg::new("status")
                        .required(true)
                        .value_parser(|s: &str| s.parse::<EssayStatus>())
                        .help("idea, in-progress, proofread or submitted"),
                ),
        )
        .subcommand(
            Command::new("emphasize")
                .about("Toggle emphasis")
                .arg(id_arg::<EssayId>("id", "Essay id")),
        )
        .subcommand(
            Command::new("title")
                .about("Replace the title")
                .arg(id_arg::<EssayId>("id", "Essay id"))
                .arg(text_arg("title", "New title")),
        )
        .subcommand(
            Command::new("body")
                .about("Replace the body")
                .arg(id_arg::<EssayId>("id", "Essay id"))
                .arg(text_arg("body", "New body")),
        )
        .subcommand(
            Command::new("resync")
                .about("Rewrite branch values from their base")
                .arg(id_arg::<EssayId>("base", "Base essay id")),
        )
}

fn value_command() -> Command {
    Command::new("value")
        .about("Manage value tags")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Create a value")
                .arg(text_arg("name", "Value name")),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a value")
                .arg(id_arg::<ValueId>("id", "Value id"))
                .arg(text_arg("name", "New name")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a value and remove it from every essay")
                .arg(id_arg::<ValueId>("id", "Value id")),
        )
        .subcommand(Command::new("list").about("List values"))
        .subcommand(
            Command::new("toggle")
                .about("Flip a value on an essay")
                .arg(id_arg::<EssayId>("essay", "Essay id"))
                .arg(id_arg::<ValueId>("value", "Value id")),
        )
        .subcommand(
            Command::new("set")
                .about("Assign a value to an essay, or remove it with --off")
                .arg(id_arg::<EssayId>("essay", "Essay id"))
                .arg(id_arg::<ValueId>("value", "Value id"))
                .arg(
                    Arg::new("off")
                        .long("off")
                        .action(ArgAction::SetTrue)
                        .help("Remove instead of assign"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        build().debug_assert();
    }

    #[test]
    fn rejects_malformed_ids() {
        let result = build().try_get_matches_from(["folio", "essay", "show", "not-a-ulid"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = build()
            .try_get_matches_from(["folio", "audit", "--student", "ada"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("student").map(String::as_str),
            Some("ada")
        );
    }
}
