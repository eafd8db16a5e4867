//! `advisor report`: collect every answer, then print summary and strategy.

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use questionnaire::{
    render_strategy_report, BusinessRecord, Session, StrategySource, SubmitOutcome,
};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, info};

use crate::cli::ReportArgs;
use crate::input::{question_text, resolve_answer};

/// Ask each remaining question on `output`, reading answers from `lines`.
///
/// Invalid numbers are re-asked. Fails if input ends first.
pub async fn collect_answers<R, W>(
    session: &mut Session,
    lines: &mut Lines<R>,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(field) = session.current_field().copied() {
        output
            .write_all(format!("\n{}\n> ", question_text(&field)).as_bytes())
            .await?;
        output.flush().await?;

        let raw = lines
            .next_line()
            .await?
            .ok_or_else(|| anyhow!("Input ended before \"{}\" was answered", field.label))?;

        match session.submit(field.key, &resolve_answer(&field, &raw)) {
            Ok(_) => {}
            Err(e) if e.is_validation() => {
                output
                    .write_all(b"Please enter a valid number.\n")
                    .await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Answer every question from an imported record.
pub fn apply_record(session: &mut Session, record: &BusinessRecord) -> anyhow::Result<()> {
    while let Some(key) = session.current_field().map(|f| f.key) {
        session
            .submit(key, record.value(key))
            .with_context(|| format!("Answer for {key}"))?;
    }
    Ok(())
}

/// Read a flat JSON object of answers.
pub fn load_answers(session: &Session, path: &Path) -> anyhow::Result<BusinessRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(BusinessRecord::from_json(session.catalog(), &value)?)
}

/// Run the report command end to end.
pub async fn run_report<R, W>(
    args: &ReportArgs,
    source: &dyn StrategySource,
    lines: &mut Lines<R>,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::marketing();

    if let Some(path) = &args.answers {
        let record = load_answers(&session, path)?;
        apply_record(&mut session, &record)?;
        info!(path = %path.display(), "Answers loaded");
    } else if args.auto_fill {
        while let SubmitOutcome::NextQuestion { .. } = session.auto_fill_step()? {}
        debug!("Answers auto-filled");
    } else {
        output
            .write_all(b"Let's build your marketing strategy. Answer each question and press Enter.\n")
            .await?;
        collect_answers(&mut session, lines, output).await?;
    }

    output
        .write_all(format!("\n{}", session.summary()).as_bytes())
        .await?;
    output
        .write_all(b"\nGenerating comprehensive marketing strategy...\n")
        .await?;
    output.flush().await?;

    session.continue_to_strategy(source).await?;
    let Some(strategy) = session.strategy() else {
        bail!("No strategy was produced");
    };

    output
        .write_all(format!("\n{}", render_strategy_report(strategy)).as_bytes())
        .await?;
    output.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    fn lines(input: &'static str) -> Lines<BufReader<&'static [u8]>> {
        BufReader::new(input.as_bytes()).lines()
    }

    #[tokio::test]
    async fn test_collect_maps_choice_numbers_and_reasks_numbers() {
        let mut session = Session::marketing();
        let mut input = lines(
            "Acme\n3\nWe fix bikes\nDenver, CO\nCommuters\n2\n2\nFlat tyres\n\
             Big Box\nSame-day\nMobile\nGrow\n1 year\nBookings\nlots\n800\n1\nFlyers\nOk\nAwareness\n",
        );
        let mut output = Vec::new();

        collect_answers(&mut session, &mut input, &mut output).await.unwrap();

        let record = session.confirmed().unwrap();
        assert_eq!(record.value("industry"), "Professional Services");
        assert_eq!(record.value("audienceAgeRange"), "25-34");
        assert_eq!(record.value("audienceIncomeLevel"), "$50k-$100k");
        assert_eq!(record.value("budget"), "800");
        assert_eq!(record.value("budgetAllocation"), "Mostly Google Ads");

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Please enter a valid number.").count(), 1);
        assert_eq!(printed.matches("What is your monthly ad budget?").count(), 2);
    }

    #[tokio::test]
    async fn test_collect_fails_when_input_ends() {
        let mut session = Session::marketing();
        let mut output = Vec::new();

        let err = collect_answers(&mut session, &mut lines("Acme\n"), &mut output)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Industry"));
        assert_eq!(session.cursor(), Some(1));
    }

    #[test]
    fn test_apply_record_rejects_bad_budget() {
        let mut session = Session::marketing();
        let mut record = BusinessRecord::empty(session.catalog());
        record.set("budget", "plenty").unwrap();

        let err = apply_record(&mut session, &record).unwrap_err();
        assert!(format!("{err:#}").contains("budget"));
    }
}
