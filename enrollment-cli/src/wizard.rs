use anyhow::Result;
use chrono::NaiveDate;
use enrollment_flow::{
    Attachment, DependentDraft, Field, Gender, MaritalStatus, Plan, Point, Relationship,
    SignaturePad, Step, Submission, SubmissionStore, TextField, WizardError, WizardSession,
    format::{brl, display_date},
    photo,
    validation::capitalize,
};
use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::prompt::Prompt;

#[derive(Clone, Copy)]
enum Action {
    Continue,
    Back,
    Edit,
}

#[derive(Clone, Copy)]
enum DependentsAction {
    Add,
    Remove,
    Continue,
    Back,
}

#[derive(Clone, Copy)]
enum ReviewAction {
    Sign,
    ClearSignature,
    Submit,
    Back,
    Quit,
}

const PERSONAL_FIELDS: [TextField; 4] = [
    TextField::FullName,
    TextField::Cpf,
    TextField::Rg,
    TextField::BirthDate,
];

const ADDRESS_FIELDS: [TextField; 9] = [
    TextField::Email,
    TextField::Phone,
    TextField::Cep,
    TextField::Street,
    TextField::Number,
    TextField::Complement,
    TextField::Neighborhood,
    TextField::City,
    TextField::State,
];

const PROFESSIONAL_FIELDS: [TextField; 3] = [
    TextField::Employer,
    TextField::Profession,
    TextField::AdmissionDate,
];

/// Walks the member through the six steps until the proposal is stored or
/// they quit
pub async fn run<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    session: &mut WizardSession,
    store: &dyn SubmissionStore,
    today: NaiveDate,
) -> Result<Option<Submission>> {
    prompt.say("AABB Aracaju - membership proposal")?;
    prompt.say(format!(
        "Press Enter to keep an answer, type {CLEAR_ANSWER} to clear it."
    ))?;
    loop {
        let step = session.current_step();
        prompt.say(format!("\n== Step {step} =="))?;
        match step {
            Step::Plan => plan(prompt, session)?,
            Step::Personal => personal(prompt, session).await?,
            Step::Address => {
                for field in ADDRESS_FIELDS {
                    ask_text(prompt, session, field)?;
                }
                ask_attachment(prompt, session, Attachment::ResidenceDocument).await?;
            }
            Step::Professional => {
                if !session.data().is_effective() {
                    prompt.say("Optional for the Comunitário plan; leave blank to skip.")?;
                }
                for field in PROFESSIONAL_FIELDS {
                    ask_text(prompt, session, field)?;
                }
            }
            Step::Dependents => {
                dependents(prompt, session, today).await?;
                continue;
            }
            Step::Review => match review(prompt, session, store).await? {
                Some(outcome) => return Ok(outcome),
                None => continue,
            },
        }

        show_errors(prompt, session)?;
        let action = prompt.choose(
            "Next",
            &[
                (Action::Continue, "Continue"),
                (Action::Back, "Back"),
                (Action::Edit, "Edit this step"),
            ],
        )?;
        match action {
            Action::Continue => {
                if let Err(e) = session.next() {
                    prompt.say(format!("{e}"))?;
                }
            }
            Action::Back => {
                session.previous();
            }
            Action::Edit => {}
        }
    }
}

fn show_errors<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    session: &WizardSession,
) -> Result<()> {
    for (field, message) in session.visible_errors().iter() {
        prompt.say(format!("  ! {}: {message}", capitalize(field.label())))?;
    }
    Ok(())
}

fn label_with_current(field: Field, current: &str) -> String {
    if current.is_empty() {
        capitalize(field.label())
    } else {
        format!("{} [{current}]", capitalize(field.label()))
    }
}

/// Answer that empties a field on re-edit
const CLEAR_ANSWER: &str = "-";

/// Blank answers keep what is already there; [`CLEAR_ANSWER`] empties it
fn ask_text<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    session: &mut WizardSession,
    field: TextField,
) -> Result<()> {
    let label = label_with_current(field.into(), session.data().text(field));
    let answer = prompt.ask(&label)?;
    match answer.as_str() {
        "" => {}
        CLEAR_ANSWER => session.set_text(field, ""),
        _ => session.set_text(field, &answer),
    }
    session.touch(field);
    Ok(())
}

async fn ask_attachment<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    session: &mut WizardSession,
    attachment: Attachment,
) -> Result<()> {
    let field = Field::from(attachment);
    let attached = if session.data().attachment(attachment).is_some() {
        " [attached]"
    } else {
        ""
    };
    let path = prompt.ask(&format!(
        "{} image file{attached} (blank to skip)",
        capitalize(field.label())
    ))?;
    if !path.is_empty() {
        match session.attach_file(attachment, &path).await {
            Ok(()) => prompt.say("  attached")?,
            Err(e) => {
                warn!(error = %e, path = %path, "attachment rejected");
                prompt.say(format!("  could not attach: {e}"))?;
            }
        }
    }
    session.touch(field);
    Ok(())
}

fn plan<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, session: &mut WizardSession) -> Result<()> {
    let descriptions: Vec<String> = Plan::ALL
        .iter()
        .map(|plan| {
            let joining = match plan.joining_fee_cents() {
                0 => "joining fee exempt".to_string(),
                cents => format!("joining fee {}", brl(cents)),
            };
            format!(
                "{} - {}/month, {joining}",
                plan.label(),
                brl(plan.monthly_fee_cents())
            )
        })
        .collect();
    let options: Vec<(Plan, &str)> = Plan::ALL
        .iter()
        .copied()
        .zip(descriptions.iter().map(String::as_str))
        .collect();
    let picked = prompt.choose("Choose a plan", &options)?;
    session.select_plan(picked);
    session.touch(Field::Plan);
    Ok(())
}

async fn personal<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    session: &mut WizardSession,
) -> Result<()> {
    ask_attachment(prompt, session, Attachment::ProfilePicture).await?;
    for field in PERSONAL_FIELDS {
        ask_text(prompt, session, field)?;
    }
    let genders: Vec<(Gender, &str)> = Gender::ALL.iter().map(|g| (*g, g.label())).collect();
    let gender = prompt.choose("Gender", &genders)?;
    session.set_gender(Some(gender));
    session.touch(Field::Gender);

    let statuses: Vec<(MaritalStatus, &str)> = MaritalStatus::ALL
        .iter()
        .map(|m| (*m, m.label()))
        .collect();
    let status = prompt.choose("Marital status", &statuses)?;
    session.set_marital_status(Some(status));
    session.touch(Field::MaritalStatus);

    ask_attachment(prompt, session, Attachment::PersonalDocument).await?;
    if status == MaritalStatus::Married {
        ask_attachment(prompt, session, Attachment::MarriageDocument).await?;
    }
    Ok(())
}

async fn optional_image<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    label: &str,
) -> Result<Option<String>> {
    let path = prompt.ask(&format!("{label} image file (blank to skip)"))?;
    if path.is_empty() {
        return Ok(None);
    }
    match photo::compress_file(&path).await {
        Ok(image) => Ok(Some(image)),
        Err(e) => {
            prompt.say(format!("  could not attach: {e}"))?;
            Ok(None)
        }
    }
}

async fn dependents<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    session: &mut WizardSession,
    today: NaiveDate,
) -> Result<()> {
    prompt.say("Children up to 24, grandparents and parents-in-law from 65.")?;
    for (index, dependent) in session.data().dependents.iter().enumerate() {
        prompt.say(format!(
            "  {}. {} - {} - {}",
            index + 1,
            dependent.name,
            dependent.relationship,
            display_date(&dependent.birth_date)
        ))?;
    }

    let action = prompt.choose(
        "Dependents",
        &[
            (DependentsAction::Add, "Add dependent"),
            (DependentsAction::Remove, "Remove dependent"),
            (DependentsAction::Continue, "Continue"),
            (DependentsAction::Back, "Back"),
        ],
    )?;
    match action {
        DependentsAction::Add => {
            let name = prompt.ask("Name")?;
            let birth_date = prompt.ask("Birth date")?;
            let relationships: Vec<(Relationship, &str)> = Relationship::ALL
                .iter()
                .map(|r| (*r, r.label()))
                .collect();
            let relationship = prompt.choose("Relationship", &relationships)?;
            let cpf_document = optional_image(prompt, "CPF copy").await?;
            let profile_picture = optional_image(prompt, "Photo").await?;
            let draft = DependentDraft {
                name,
                birth_date,
                relationship: Some(relationship),
                profile_picture,
                cpf_document,
            };
            match session.add_dependent(&draft, today) {
                Ok(dependent) => prompt.say(format!("  added {}", dependent.name))?,
                Err(e) => prompt.say(format!("  {e}"))?,
            }
        }
        DependentsAction::Remove => {
            let listed: Vec<(usize, &str)> = session
                .data()
                .dependents
                .iter()
                .enumerate()
                .map(|(i, d)| (i, d.name.as_str()))
                .collect();
            if listed.is_empty() {
                prompt.say("  no dependents to remove")?;
                return Ok(());
            }
            let index = prompt.choose("Remove which?", &listed)?;
            let id = session.data().dependents[index].id.clone();
            session.remove_dependent(&id)?;
        }
        DependentsAction::Continue => {
            session.next()?;
        }
        DependentsAction::Back => {
            session.previous();
        }
    }
    Ok(())
}

fn summary(session: &WizardSession) -> Vec<String> {
    let data = session.data();
    let mut lines = Vec::new();
    if let Some(plan) = data.plan {
        lines.push(format!(
            "Plan: {} ({}/month)",
            plan.label(),
            brl(plan.monthly_fee_cents())
        ));
    }
    lines.push(format!("Holder: {} - CPF {}", data.personal.full_name, data.personal.cpf));
    lines.push(format!("Contact: {} - {}", data.contact.email, data.contact.phone));
    lines.push(format!(
        "Address: {}, {} - {}/{}",
        data.contact.street, data.contact.number, data.contact.city, data.contact.state
    ));
    lines.push(format!("Dependents: {}", data.dependents.len()));
    lines.push(format!(
        "Signature: {}",
        if data.signature.is_some() { "captured" } else { "missing" }
    ));
    lines
}

async fn load_signature(path: &str) -> Result<Option<String>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let strokes: Vec<Vec<Point>> = serde_json::from_str(&raw)?;
    let mut pad = SignaturePad::new();
    Ok(pad.replay(&strokes)?.and_then(|update| update.into_value()))
}

/// `Some(outcome)` ends the wizard; `None` keeps looping
async fn review<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    session: &mut WizardSession,
    store: &dyn SubmissionStore,
) -> Result<Option<Option<Submission>>> {
    for line in summary(session) {
        prompt.say(line)?;
    }
    if session.signature_required() {
        prompt.say("  ! Signature required to finish.")?;
    }

    let action = prompt.choose(
        "Finish",
        &[
            (ReviewAction::Sign, "Sign (load strokes file)"),
            (ReviewAction::ClearSignature, "Clear signature"),
            (ReviewAction::Submit, "Submit proposal"),
            (ReviewAction::Back, "Back"),
            (ReviewAction::Quit, "Quit without submitting"),
        ],
    )?;
    match action {
        ReviewAction::Sign => {
            let path = prompt.ask("Signature strokes file (JSON)")?;
            match load_signature(&path).await {
                Ok(Some(signature)) => {
                    session.set_signature(Some(signature));
                    prompt.say("  signature captured")?;
                }
                Ok(None) => prompt.say("  the file has no strokes")?,
                Err(e) => prompt.say(format!("  could not read signature: {e}"))?,
            }
        }
        ReviewAction::ClearSignature => session.set_signature(None),
        ReviewAction::Submit => match session.submit(store).await {
            Ok(submission) => {
                prompt.say(format!(
                    "Proposal {} sent. It will be reviewed by the club secretariat.",
                    submission.id
                ))?;
                return Ok(Some(Some(submission)));
            }
            Err(WizardError::SignatureRequired) => {}
            Err(WizardError::Storage(e)) if e.is_quota_exceeded() => prompt.say(format!("  {e}"))?,
            Err(e) => prompt.say(format!("  could not submit: {e}"))?,
        },
        ReviewAction::Back => {
            session.previous();
        }
        ReviewAction::Quit => {
            info!("enrollment abandoned");
            return Ok(Some(None));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted;
    use enrollment_flow::{InMemorySubmissionStore, SubmissionStatus, Wizard};
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn community_enrollment_from_script() {
        let dir = tempfile::tempdir().unwrap();
        let strokes = dir.path().join("strokes.json");
        std::fs::write(&strokes, "[[{\"x\":10,\"y\":10},{\"x\":120,\"y\":60}]]").unwrap();
        let strokes = strokes.to_string_lossy().into_owned();

        #[rustfmt::skip]
        let script = vec![
            // plan
            "1", "1",
            // personal: photo, name, cpf, rg, birth date, gender, marital, id document
            "", "Maria da Silva", "12345678901", "", "02/04/1990", "2", "1", "",
            "1",
            // address
            "maria@example.com", "79999998888", "49000000", "Av. Beira Mar", "100", "",
            "Atalaia", "Aracaju", "SE", "", "1",
            // professional, optional
            "", "", "", "1",
            // dependents: add a child, then continue
            "1", "Pedro Silva", "2015-09-30", "2", "", "",
            "3",
            // review: submit unsigned, sign, submit
            "3", "1", strokes.as_str(), "3",
        ];
        let mut prompt = scripted(&script);
        let store = InMemorySubmissionStore::new();
        let mut session = WizardSession::new(Arc::new(Wizard::standard()));

        let submission = run(&mut prompt, &mut session, &store, today())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.data.personal.cpf, "123.456.789-01");
        assert_eq!(submission.data.dependents.len(), 1);
        assert!(submission.data.signature.is_some());

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.contains("Signature required to finish."));
        assert!(output.contains(&format!("Proposal {} sent.", submission.id)));
    }

    #[test]
    fn dash_clears_an_optional_field_and_blank_keeps_it() {
        let mut prompt = scripted(&["Apto 2", "", "-"]);
        let mut session = WizardSession::new(Arc::new(Wizard::standard()));

        ask_text(&mut prompt, &mut session, TextField::Complement).unwrap();
        assert_eq!(session.data().text(TextField::Complement), "Apto 2");
        ask_text(&mut prompt, &mut session, TextField::Complement).unwrap();
        assert_eq!(session.data().text(TextField::Complement), "Apto 2");
        ask_text(&mut prompt, &mut session, TextField::Complement).unwrap();
        assert_eq!(session.data().text(TextField::Complement), "");

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.contains("[Apto 2]"));
    }

    #[tokio::test]
    async fn incomplete_step_does_not_advance() {
        #[rustfmt::skip]
        let script = vec![
            "1", "1",
            "", "Maria", "123", "", "", "1", "1", "",
            "1",
        ];
        let mut prompt = scripted(&script);
        let store = InMemorySubmissionStore::new();
        let mut session = WizardSession::new(Arc::new(Wizard::standard()));

        assert!(run(&mut prompt, &mut session, &store, today()).await.is_err());
        assert_eq!(session.current_step(), Step::Personal);
        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.contains("Invalid CPF (11 digits)."));
        assert!(output.contains("step 2 (Pessoal) is incomplete"));
    }
}
