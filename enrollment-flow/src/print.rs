//! Plain-text paper form for a stored enrollment.

use std::fmt::Write;

use crate::format::display_date;
use crate::model::{Plan, Submission};

const WIDTH: usize = 72;

fn rule(out: &mut String, ch: char) {
    out.push_str(&ch.to_string().repeat(WIDTH));
    out.push('\n');
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    let _ = writeln!(out, "[ {} ]", title.to_uppercase());
}

fn row(out: &mut String, label: &str, value: &str) {
    let value = if value.trim().is_empty() { "-" } else { value };
    let _ = writeln!(out, "  {:<14} {}", format!("{label}:"), value);
}

/// Renders the proposal sheet: header, holder, address and contact,
/// professional data, dependents, signature block and attachments
pub fn render(submission: &Submission) -> String {
    let data = &submission.data;
    let personal = &data.personal;
    let contact = &data.contact;
    let mut out = String::new();

    rule(&mut out, '=');
    let _ = writeln!(out, "AABB ARACAJU - Associação Atlética Banco do Brasil");
    let _ = writeln!(out, "FICHA DE ADESÃO");
    let _ = writeln!(out, "Nº PROPOSTA: {}", submission.id);
    let _ = writeln!(out, "Data: {}", submission.created_at.format("%d/%m/%Y"));
    let _ = writeln!(out, "Situação: {}", submission.status);
    rule(&mut out, '=');

    section(&mut out, "Titular");
    row(&mut out, "Nome", &personal.full_name.to_uppercase());
    let category = match data.plan {
        Some(Plan::Community) => "COMUNITÁRIO",
        Some(Plan::Effective) => "EFETIVO",
        None => "",
    };
    row(&mut out, "Categoria", category);
    row(&mut out, "CPF", &personal.cpf);
    row(&mut out, "RG", &personal.rg);
    row(&mut out, "Nascimento", &display_date(&personal.birth_date));
    row(
        &mut out,
        "Sexo",
        personal.gender.map(|g| g.label()).unwrap_or_default(),
    );
    row(
        &mut out,
        "Estado civil",
        personal.marital_status.map(|m| m.label()).unwrap_or_default(),
    );

    section(&mut out, "Endereço e contato");
    let street = [
        contact.street.as_str(),
        contact.number.as_str(),
        contact.complement.as_str(),
    ]
    .iter()
    .filter(|part| !part.trim().is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(", ");
    row(&mut out, "Logradouro", &street.to_uppercase());
    row(&mut out, "Bairro", &contact.neighborhood.to_uppercase());
    let city = if contact.city.is_empty() && contact.state.is_empty() {
        String::new()
    } else {
        format!("{} / {}", contact.city, contact.state).to_uppercase()
    };
    row(&mut out, "Cidade/UF", &city);
    row(&mut out, "CEP", &contact.cep);
    row(&mut out, "Email", &contact.email);
    row(&mut out, "Telefone", &contact.phone);

    section(&mut out, "Dados profissionais");
    let professional = &data.professional;
    row(&mut out, "Empresa", &professional.employer.to_uppercase());
    row(&mut out, "Profissão", &professional.profession.to_uppercase());
    row(
        &mut out,
        "Admissão",
        &display_date(&professional.admission_date),
    );

    section(&mut out, "Dependentes");
    if data.dependents.is_empty() {
        let _ = writeln!(out, "  Nenhum dependente declarado.");
    } else {
        let _ = writeln!(out, "  {:<36} {:<12} {}", "NOME", "NASCIMENTO", "PARENTESCO");
        for dependent in &data.dependents {
            let _ = writeln!(
                out,
                "  {:<36} {:<12} {}",
                dependent.name.to_uppercase(),
                display_date(&dependent.birth_date),
                dependent.relationship.label().to_uppercase()
            );
        }
    }

    out.push('\n');
    let mark = if data.signature.is_some() {
        "[assinatura digital registrada]"
    } else {
        ""
    };
    let _ = writeln!(out, "  {mark}");
    let _ = writeln!(out, "  {}", "_".repeat(34));
    let _ = writeln!(out, "  {}", personal.full_name.to_uppercase());
    let _ = writeln!(out, "  Assinatura do Proponente");
    out.push('\n');
    let _ = writeln!(out, "  {}", "_".repeat(34));
    let _ = writeln!(out, "  AABB ARACAJU");
    let _ = writeln!(out, "  Visto da Secretaria");

    section(&mut out, "Anexos");
    let mut attachments = Vec::new();
    for (present, label) in [
        (personal.profile_picture.is_some(), "Foto 3x4 titular".to_string()),
        (personal.personal_document.is_some(), "Documento (RG/CNH)".to_string()),
        (contact.residence_document.is_some(), "Comprovante de residência".to_string()),
        (personal.marriage_document.is_some(), "Certidão de casamento".to_string()),
    ] {
        if present {
            attachments.push(label);
        }
    }
    for (index, dependent) in data.dependents.iter().enumerate() {
        if dependent.profile_picture.is_some() {
            attachments.push(format!("Dep {}: {} (foto)", index + 1, dependent.name));
        }
        if dependent.cpf_document.is_some() {
            attachments.push(format!("Dep {}: {} (CPF)", index + 1, dependent.name));
        }
    }
    if attachments.is_empty() {
        let _ = writeln!(out, "  Nenhum documento anexado.");
    }
    for attachment in attachments {
        let _ = writeln!(out, "  - {attachment}");
    }

    out.push('\n');
    rule(&mut out, '-');
    let _ = writeln!(
        out,
        "A aprovação desta proposta está sujeita à análise da diretoria da AABB Aracaju."
    );
    out
}
