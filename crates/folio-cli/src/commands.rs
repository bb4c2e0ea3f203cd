//! Command dispatch
//!
//! Maps parsed arguments onto portfolio operations and renders results as
//! plain text lines.

use anyhow::{anyhow, Context};
use clap::ArgMatches;
use folio_core::{
    Activity, CollegeId, Essay, EssayId, EssayKind, EssayStatus, Honor, IdeaRequest, IdeaSource,
    Portfolio, PromptId, StaticIdeaSource, StepLog, Unlinked, ValueId,
};
use std::collections::HashMap;
use std::io::Write;

fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a T> {
    args.get_one::<T>(name)
        .ok_or_else(|| anyhow!("missing argument <{name}>"))
}

fn text<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    required::<String>(args, name).map(String::as_str)
}

/// Run one parsed invocation against a portfolio
pub async fn run(
    matches: &ArgMatches,
    portfolio: &Portfolio,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("college", args)) => college(args, portfolio, out).await,
        Some(("prompt", args)) => prompt(args, portfolio, out).await,
        Some(("idea", args)) => {
            let essay = portfolio
                .graph()
                .create_idea(
                    text(args, "title")?,
                    text(args, "text")?,
                    args.get_flag("common-app"),
                    args.get_one::<String>("prompt-text").cloned(),
                )
                .await?;
            writeln!(out, "{}", essay.id)?;
            Ok(())
        }
        Some(("suggest", args)) => suggest(args, portfolio, out).await,
        Some(("essay", args)) => essay(args, portfolio, out).await,
        Some(("value", args)) => value(args, portfolio, out).await,
        Some(("coverage", args)) => coverage(args, portfolio, out).await,
        Some(("audit", _)) => {
            let report = portfolio.audit().await?;
            if report.is_clean() {
                writeln!(out, "no issues")?;
            }
            for issue in report.issues() {
                writeln!(out, "{issue}")?;
            }
            Ok(())
        }
        Some((other, _)) => Err(anyhow!("unknown command {other}")),
        None => Err(anyhow!("no command given")),
    }
}

async fn college(args: &ArgMatches, portfolio: &Portfolio, out: &mut dyn Write) -> anyhow::Result<()> {
    let registry = portfolio.registry();
    match args.subcommand() {
        Some(("add", args)) => {
            let college = registry.add_college(text(args, "name")?).await?;
            writeln!(out, "{}", college.id)?;
        }
        Some(("rename", args)) => {
            let college = registry
                .rename_college(*required::<CollegeId>(args, "id")?, text(args, "name")?)
                .await?;
            writeln!(out, "{}  {}", college.id, college.name)?;
        }
        Some(("list", _)) => {
            for college in registry.colleges().await? {
                writeln!(out, "{}  {}", college.id, college.name)?;
            }
        }
        _ => return Err(anyhow!("unknown college command")),
    }
    Ok(())
}

async fn prompt(args: &ArgMatches, portfolio: &Portfolio, out: &mut dyn Write) -> anyhow::Result<()> {
    let registry = portfolio.registry();
    match args.subcommand() {
        Some(("add", args)) => {
            let prompt = registry
                .add_prompt(
                    *required::<CollegeId>(args, "college")?,
                    text(args, "text")?,
                    args.get_one::<u32>("limit").copied(),
                )
                .await?;
            writeln!(out, "{}", prompt.id)?;
        }
        Some(("delete", args)) => {
            let prompt = registry.delete_prompt(*required::<PromptId>(args, "id")?).await?;
            if let Some(essay) = prompt.linked_essay_id {
                writeln!(out, "deleted; essay {essay} still references it")?;
            } else {
                writeln!(out, "deleted")?;
            }
        }
        Some(("text", args)) => {
            registry
                .update_prompt_text(*required::<PromptId>(args, "id")?, text(args, "text")?)
                .await?;
        }
        Some(("limit", args)) => {
            registry
                .update_word_limit(
                    *required::<PromptId>(args, "id")?,
                    args.get_one::<u32>("limit").copied(),
                )
                .await?;
        }
        Some(("list", args)) => {
            let prompts = match args.get_one::<CollegeId>("college") {
                Some(college) => registry.prompts_for(*college).await?,
                None => registry.prompts().await?,
            };
            for prompt in prompts {
                let limit = prompt
                    .word_limit
                    .map_or_else(|| "-".to_string(), |l| l.to_string());
                let linked = prompt
                    .linked_essay_id
                    .map_or_else(|| "unlinked".to_string(), |e| e.to_string());
                writeln!(
                    out,
                    "{}  {}  limit {limit}  {linked}  {}",
                    prompt.id, prompt.college_id, prompt.text
                )?;
            }
        }
        _ => return Err(anyhow!("unknown prompt command")),
    }
    Ok(())
}

async fn suggest(args: &ArgMatches, portfolio: &Portfolio, out: &mut dyn Write) -> anyhow::Result<()> {
    let prompt_text = text(args, "prompt-text")?;
    let mut request = IdeaRequest::new(prompt_text);
    for entry in args.get_many::<String>("activity").into_iter().flatten() {
        let (name, role) = match entry.split_once(':') {
            Some((name, role)) => (name.to_string(), Some(role.to_string())),
            None => (entry.clone(), None),
        };
        request = request.with_activity(Activity {
            name,
            role,
            description: String::new(),
        });
    }
    for title in args.get_many::<String>("honor").into_iter().flatten() {
        request = request.with_honor(Honor {
            title: title.clone(),
            level: None,
        });
    }

    let source: &dyn IdeaSource = &StaticIdeaSource::default();
    let suggestions = portfolio.suggest_ideas(source, &request).await?;

    match args.get_one::<usize>("pick") {
        Some(&pick) => {
            let suggestion = pick
                .checked_sub(1)
                .and_then(|i| suggestions.get(i))
                .with_context(|| format!("no suggestion #{pick} ({} offered)", suggestions.len()))?;
            let essay = portfolio
                .create_idea_from_suggestion(
                    suggestion,
                    args.get_flag("common-app"),
                    Some(prompt_text.to_string()),
                )
                .await?;
            writeln!(out, "{}", essay.id)?;
        }
        None => {
            for (i, suggestion) in suggestions.iter().enumerate() {
                writeln!(out, "{}. {}: {}", i + 1, suggestion.title, suggestion.angle)?;
            }
        }
    }
    Ok(())
}

async fn essay(args: &ArgMatches, portfolio: &Portfolio, out: &mut dyn Write) -> anyhow::Result<()> {
    let graph = portfolio.graph();
    match args.subcommand() {
        Some(("show", args)) => {
            let id = *required::<EssayId>(args, "id")?;
            let essay = graph.essay(id).await?;
            let budget = graph.word_budget(id).await?;
            show_essay(&essay, portfolio, out).await?;
            match budget.limit {
                Some(limit) => writeln!(out, "words:    {} / {limit}", budget.words)?,
                None => writeln!(out, "words:    {}", budget.words)?,
            }
            if !essay.body.is_empty() {
                writeln!(out)?;
                writeln!(out, "{}", essay.body)?;
            }
        }
        Some(("list", _)) => {
            for essay in graph.essays().await? {
                writeln!(out, "{}", summary(&essay))?;
            }
        }
        Some(("branch", args)) => {
            let outcome = graph
                .branch_essay(*required::<PromptId>(args, "prompt")?, *required::<EssayId>(args, "base")?)
                .await?;
            report_steps(&outcome.log, out)?;
            writeln!(out, "{}", outcome.value.id)?;
        }
        Some(("custom", args)) => {
            let outcome = graph
                .write_custom_for_prompt(*required::<PromptId>(args, "prompt")?)
                .await?;
            report_steps(&outcome.log, out)?;
            writeln!(out, "{}", outcome.value.id)?;
        }
        Some(("link", args)) => {
            let outcome = graph
                .link_essay_to_prompt(*required::<PromptId>(args, "prompt")?, *required::<EssayId>(args, "essay")?)
                .await?;
            report_steps(&outcome.log, out)?;
        }
        Some(("unlink", args)) => {
            let outcome = graph
                .unlink_essay_from_prompt(*required::<PromptId>(args, "prompt")?)
                .await?;
            match outcome.value {
                Unlinked::NothingLinked => writeln!(out, "nothing linked")?,
                Unlinked::DeletedFork(id) => writeln!(out, "unlinked; branch {id} deleted")?,
                Unlinked::Detached(id) => writeln!(out, "unlinked; essay {id} kept")?,
                Unlinked::ClearedDangling(id) => {
                    writeln!(out, "cleared link to missing essay {id}")?;
                }
            }
        }
        Some(("delete", args)) => {
            graph.delete_essay(*required::<EssayId>(args, "id")?).await?;
        }
        Some(("status", args)) => {
            graph
                .set_status(*required::<EssayId>(args, "id")?, *required::<EssayStatus>(args, "status")?)
                .await?;
        }
        Some(("emphasize", args)) => {
            let essay = graph.toggle_emphasis(*required::<EssayId>(args, "id")?).await?;
            writeln!(out, "{}", if essay.is_emphasized { "emphasized" } else { "not emphasized" })?;
        }
        Some(("title", args)) => {
            graph
                .update_title(*required::<EssayId>(args, "id")?, text(args, "title")?)
                .await?;
        }
        Some(("body", args)) => {
            graph
                .update_body(*required::<EssayId>(args, "id")?, text(args, "body")?)
                .await?;
        }
        Some(("resync", args)) => {
            let outcome = graph.resync_branches(*required::<EssayId>(args, "base")?).await?;
            writeln!(out, "{} branch(es) rewritten", outcome.value)?;
        }
        _ => return Err(anyhow!("unknown essay command")),
    }
    Ok(())
}

async fn value(args: &ArgMatches, portfolio: &Portfolio, out: &mut dyn Write) -> anyhow::Result<()> {
    let values = portfolio.values();
    match args.subcommand() {
        Some(("add", args)) => {
            let value = values.create_value(text(args, "name")?).await?;
            writeln!(out, "{}  {}", value.id, value.color)?;
        }
        Some(("rename", args)) => {
            values
                .rename_value(*required::<ValueId>(args, "id")?, text(args, "name")?)
                .await?;
        }
        Some(("delete", args)) => {
            let outcome = values.delete_value(*required::<ValueId>(args, "id")?).await?;
            writeln!(out, "removed from {} essay(s)", outcome.value.essays_updated)?;
        }
        Some(("list", _)) => {
            for value in values.values().await? {
                writeln!(out, "{}  {}  {}", value.id, value.color, value.name)?;
            }
        }
        Some(("toggle", args)) => {
            let outcome = portfolio
                .graph()
                .toggle_value_on_essay(*required::<EssayId>(args, "essay")?, *required::<ValueId>(args, "value")?)
                .await?;
            report_steps(&outcome.log, out)?;
        }
        Some(("set", args)) => {
            let outcome = portfolio
                .graph()
                .set_value_on_essay(
                    *required::<EssayId>(args, "essay")?,
                    *required::<ValueId>(args, "value")?,
                    !args.get_flag("off"),
                )
                .await?;
            report_steps(&outcome.log, out)?;
        }
        _ => return Err(anyhow!("unknown value command")),
    }
    Ok(())
}

async fn coverage(args: &ArgMatches, portfolio: &Portfolio, out: &mut dyn Write) -> anyhow::Result<()> {
    let names: HashMap<ValueId, String> = portfolio
        .values()
        .values()
        .await?
        .into_iter()
        .map(|v| (v.id, v.name))
        .collect();
    let name_of = |id: &ValueId| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    if let Some(college_id) = args.get_one::<CollegeId>("college") {
        let college = portfolio.registry().college(*college_id).await?;
        let covered = portfolio.coverage().coverage_for_college(college.id).await?;
        let missing = portfolio.coverage().missing_values(college.id).await?;
        writeln!(out, "{}", college.name)?;
        writeln!(out, "  covered: {}", covered.iter().map(&name_of).collect::<Vec<_>>().join(", "))?;
        writeln!(out, "  missing: {}", missing.into_iter().map(|v| v.name).collect::<Vec<_>>().join(", "))?;
        return Ok(());
    }

    let colleges: HashMap<CollegeId, String> = portfolio
        .registry()
        .colleges()
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    for (college_id, covered) in portfolio.coverage().coverage_by_college().await? {
        let name = colleges.get(&college_id).map_or("?", String::as_str);
        writeln!(
            out,
            "{name}: {}",
            covered.iter().map(&name_of).collect::<Vec<_>>().join(", ")
        )?;
    }
    Ok(())
}

fn summary(essay: &Essay) -> String {
    let star = if essay.is_emphasized { "*" } else { " " };
    format!(
        "{}{star} {:<9} {:<11} {}",
        essay.id,
        essay.kind.tag(),
        essay.status.label(),
        essay.title
    )
}

async fn show_essay(essay: &Essay, portfolio: &Portfolio, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "id:       {}", essay.id)?;
    writeln!(out, "title:    {}", essay.title)?;
    writeln!(out, "kind:     {}", essay.kind.tag())?;
    writeln!(out, "status:   {}", essay.status)?;
    if let EssayKind::Branch(target) = &essay.kind {
        writeln!(out, "prompt:   {}", target.prompt_id)?;
        if let Some(base) = target.source_essay_id {
            writeln!(out, "forked:   {base}")?;
        }
    }
    if let Some(prompt_text) = &essay.prompt_text {
        writeln!(out, "for:      {prompt_text}")?;
    }
    if !essay.assigned_values.is_empty() {
        let names: Vec<String> = portfolio
            .values()
            .values()
            .await?
            .into_iter()
            .filter(|v| essay.assigned_values.contains(&v.id))
            .map(|v| v.name)
            .collect();
        writeln!(out, "values:   {}", names.join(", "))?;
    }
    if essay.is_emphasized {
        writeln!(out, "emphasized")?;
    }
    Ok(())
}

fn report_steps(log: &StepLog, out: &mut dyn Write) -> anyhow::Result<()> {
    if log.is_empty() {
        writeln!(out, "already up to date")?;
    }
    for step in log.steps() {
        writeln!(out, "  {step}")?;
    }
    Ok(())
}
