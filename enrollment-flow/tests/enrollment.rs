use chrono::NaiveDate;
use enrollment_flow::{
    AdminPanel, Attachment, DependentDraft, Gender, JsonFileSubmissionStore, MaritalStatus,
    PadEvent, Plan, Point, Relationship, SignaturePad, Step, SubmissionStatus, SubmissionStore,
    TextField, Wizard, WizardError, WizardSession,
};
use image::{Rgb, RgbImage};
use std::path::Path;
use std::sync::Arc;

fn write_photo(path: &Path) {
    RgbImage::from_pixel(1600, 1200, Rgb([30, 90, 160]))
        .save(path)
        .unwrap();
}

fn sign(session: &mut WizardSession) {
    let mut pad = SignaturePad::new();
    pad.handle(PadEvent::Down(Point::new(40.0, 120.0))).unwrap();
    pad.handle(PadEvent::Move(Point::new(200.0, 80.0))).unwrap();
    pad.handle(PadEvent::Move(Point::new(380.0, 140.0))).unwrap();
    let update = pad.handle(PadEvent::Up).unwrap().unwrap();
    session.apply_signature(update);
}

#[tokio::test]
async fn effective_member_enrolls_with_family() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.png");
    write_photo(&photo);
    let store = Arc::new(JsonFileSubmissionStore::new(dir.path().join("submissions.json")));
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    let mut session = WizardSession::new(Arc::new(Wizard::standard()));
    session.select_plan(Plan::Effective);
    assert_eq!(session.next().unwrap(), Step::Personal);

    session.set_text(TextField::FullName, "João Batista Santos");
    session.set_text(TextField::Cpf, "98765432100");
    session.set_text(TextField::Rg, "1234567");
    session.set_text(TextField::BirthDate, "15/08/1975");
    session.set_gender(Some(Gender::Male));
    session.set_marital_status(Some(MaritalStatus::Married));
    assert!(!session.can_continue());

    session.attach_file(Attachment::ProfilePicture, &photo).await.unwrap();
    session.attach_file(Attachment::MarriageDocument, &photo).await.unwrap();
    assert_eq!(session.next().unwrap(), Step::Address);

    session.set_text(TextField::Email, "joao@bb.com.br");
    session.set_text(TextField::Phone, "(79) 99988-7766");
    session.set_text(TextField::Cep, "49035-000");
    session.set_text(TextField::Street, "Rua Propriá");
    session.set_text(TextField::Number, "45");
    session.set_text(TextField::Neighborhood, "Centro");
    session.set_text(TextField::City, "Aracaju");
    session.set_text(TextField::State, "SE");
    assert_eq!(session.next().unwrap(), Step::Professional);

    assert!(!session.can_continue());
    session.set_text(TextField::Employer, "Banco do Brasil");
    session.set_text(TextField::Profession, "Escriturário");
    session.set_text(TextField::AdmissionDate, "2001-03-12");
    assert_eq!(session.next().unwrap(), Step::Dependents);

    let spouse = DependentDraft {
        name: "Ana Santos".into(),
        birth_date: "1978-02-10".into(),
        relationship: Some(Relationship::Spouse),
        ..Default::default()
    };
    session.add_dependent(&spouse, today).unwrap();
    let grandmother = DependentDraft {
        name: "Rita Santos".into(),
        birth_date: "1965-01-01".into(),
        relationship: Some(Relationship::Grandparent),
        ..Default::default()
    };
    assert!(matches!(
        session.add_dependent(&grandmother, today),
        Err(WizardError::Dependent(_))
    ));
    assert_eq!(session.data().dependents.len(), 1);
    assert_eq!(session.next().unwrap(), Step::Review);

    assert!(matches!(
        session.submit(&*store).await,
        Err(WizardError::SignatureRequired)
    ));
    assert!(session.signature_required());
    sign(&mut session);
    let submission = session.submit(&*store).await.unwrap();

    let reopened = JsonFileSubmissionStore::new(store.path());
    let all = reopened.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, submission.id);
    assert_eq!(all[0].status, SubmissionStatus::Pending);
    assert_eq!(all[0].data.personal.cpf, "987.654.321-00");
    assert_eq!(all[0].data.personal.birth_date, "1975-08-15");
    assert!(
        all[0]
            .data
            .personal
            .profile_picture
            .as_deref()
            .is_some_and(|url| url.starts_with("data:image/jpeg;base64,"))
    );

    let admin = AdminPanel::new(store.clone());
    assert_eq!(admin.list(Some("joão")).await.unwrap().len(), 1);
    let approved = admin.approve(&submission.id).await.unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);
    let sheet = admin.print(&submission.id).await.unwrap();
    assert!(sheet.contains("JOÃO BATISTA SANTOS"));
    assert!(sheet.contains("ANA SANTOS"));
}

#[tokio::test]
async fn second_submission_goes_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileSubmissionStore::new(dir.path().join("submissions.json"));
    let wizard = Arc::new(Wizard::standard());

    let mut ids = Vec::new();
    for name in ["Lucas Prado", "Marta Prado"] {
        let mut session = WizardSession::new(wizard.clone());
        session.select_plan(Plan::Community);
        session.next().unwrap();
        session.set_text(TextField::FullName, name);
        session.set_text(TextField::Cpf, "11122233344");
        session.set_text(TextField::BirthDate, "1990-01-01");
        session.set_gender(Some(Gender::Other));
        session.set_marital_status(Some(MaritalStatus::Single));
        session.next().unwrap();
        session.set_text(TextField::Email, "prado@example.com");
        session.set_text(TextField::Phone, "7932221100");
        session.set_text(TextField::Cep, "49000000");
        session.set_text(TextField::Street, "Rua A");
        session.set_text(TextField::Number, "1");
        session.set_text(TextField::Neighborhood, "Farolândia");
        session.set_text(TextField::City, "Aracaju");
        session.set_text(TextField::State, "SE");
        session.next().unwrap();
        session.next().unwrap();
        session.next().unwrap();
        sign(&mut session);
        ids.push(session.submit(&store).await.unwrap().id);
    }

    let all = store.list().await.unwrap();
    assert_eq!(
        all.iter().map(|s| s.id.clone()).collect::<Vec<_>>(),
        vec![ids[1].clone(), ids[0].clone()]
    );
}
