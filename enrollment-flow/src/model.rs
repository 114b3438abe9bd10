use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership tier chosen on the first step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    /// Open to the general community; pays the joining fee
    Community,
    /// Reserved for Banco do Brasil employees, active or retired
    Effective,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Community, Plan::Effective];

    pub fn label(&self) -> &'static str {
        match self {
            Plan::Community => "Comunitário Família",
            Plan::Effective => "Efetivo Família",
        }
    }

    /// Monthly fee in BRL cents
    pub fn monthly_fee_cents(&self) -> u32 {
        match self {
            Plan::Community => 18_400,
            Plan::Effective => 12_900,
        }
    }

    /// Joining fee in BRL cents, zero when exempt
    pub fn joining_fee_cents(&self) -> u32 {
        match self {
            Plan::Community => 60_000,
            Plan::Effective => 0,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Masculino",
            Gender::Female => "Feminino",
            Gender::Other => "Outro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
    CivilUnion,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 5] = [
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::Divorced,
        MaritalStatus::Widowed,
        MaritalStatus::CivilUnion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Solteiro(a)",
            MaritalStatus::Married => "Casado(a)",
            MaritalStatus::Divorced => "Divorciado(a)",
            MaritalStatus::Widowed => "Viúvo(a)",
            MaritalStatus::CivilUnion => "União Estável",
        }
    }
}

/// How a dependent relates to the member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    Spouse,
    Child,
    Stepchild,
    Parent,
    Grandparent,
    ParentInLaw,
}

impl Relationship {
    pub const ALL: [Relationship; 6] = [
        Relationship::Spouse,
        Relationship::Child,
        Relationship::Stepchild,
        Relationship::Parent,
        Relationship::Grandparent,
        Relationship::ParentInLaw,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Relationship::Spouse => "Cônjuge",
            Relationship::Child => "Filho(a)",
            Relationship::Stepchild => "Enteado(a)",
            Relationship::Parent => "Pai/Mãe",
            Relationship::Grandparent => "Avô/Avó",
            Relationship::ParentInLaw => "Sogro/Sogra",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every field of the draft that can carry a validation error or be touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Plan,
    ProfilePicture,
    FullName,
    Cpf,
    Rg,
    PersonalDocument,
    BirthDate,
    Gender,
    MaritalStatus,
    MarriageDocument,
    Email,
    Phone,
    Cep,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    ResidenceDocument,
    Employer,
    Profession,
    AdmissionDate,
    DependentName,
    DependentBirthDate,
    DependentRelationship,
    Signature,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Plan => "plan",
            Field::ProfilePicture => "profile photo",
            Field::FullName => "full name",
            Field::Cpf => "CPF",
            Field::Rg => "RG",
            Field::PersonalDocument => "identity document",
            Field::BirthDate => "birth date",
            Field::Gender => "gender",
            Field::MaritalStatus => "marital status",
            Field::MarriageDocument => "marriage certificate",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Cep => "CEP",
            Field::Street => "street",
            Field::Number => "number",
            Field::Complement => "complement",
            Field::Neighborhood => "neighborhood",
            Field::City => "city",
            Field::State => "state",
            Field::ResidenceDocument => "proof of residence",
            Field::Employer => "employer",
            Field::Profession => "profession",
            Field::AdmissionDate => "admission date",
            Field::DependentName => "name",
            Field::DependentBirthDate => "birth date",
            Field::DependentRelationship => "relationship",
            Field::Signature => "signature",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-text fields edited directly by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FullName,
    Cpf,
    Rg,
    BirthDate,
    Email,
    Phone,
    Cep,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    Employer,
    Profession,
    AdmissionDate,
}

impl From<TextField> for Field {
    fn from(field: TextField) -> Self {
        match field {
            TextField::FullName => Field::FullName,
            TextField::Cpf => Field::Cpf,
            TextField::Rg => Field::Rg,
            TextField::BirthDate => Field::BirthDate,
            TextField::Email => Field::Email,
            TextField::Phone => Field::Phone,
            TextField::Cep => Field::Cep,
            TextField::Street => Field::Street,
            TextField::Number => Field::Number,
            TextField::Complement => Field::Complement,
            TextField::Neighborhood => Field::Neighborhood,
            TextField::City => Field::City,
            TextField::State => Field::State,
            TextField::Employer => Field::Employer,
            TextField::Profession => Field::Profession,
            TextField::AdmissionDate => Field::AdmissionDate,
        }
    }
}

/// Image slots of the member record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    ProfilePicture,
    PersonalDocument,
    MarriageDocument,
    ResidenceDocument,
}

impl From<Attachment> for Field {
    fn from(attachment: Attachment) -> Self {
        match attachment {
            Attachment::ProfilePicture => Field::ProfilePicture,
            Attachment::PersonalDocument => Field::PersonalDocument,
            Attachment::MarriageDocument => Field::MarriageDocument,
            Attachment::ResidenceDocument => Field::ResidenceDocument,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub profile_picture: Option<String>,
    pub full_name: String,
    pub cpf: String,
    pub rg: String,
    /// ISO `YYYY-MM-DD`
    pub birth_date: String,
    pub gender: Option<Gender>,
    pub marital_status: Option<MaritalStatus>,
    pub personal_document: Option<String>,
    pub marriage_document: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub cep: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub residence_document: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalInfo {
    pub employer: String,
    pub profession: String,
    /// ISO `YYYY-MM-DD`
    pub admission_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependent {
    pub id: String,
    pub name: String,
    /// ISO `YYYY-MM-DD`
    pub birth_date: String,
    pub relationship: Relationship,
    pub profile_picture: Option<String>,
    pub cpf_document: Option<String>,
}

/// Dependent being filled in before the eligibility check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependentDraft {
    pub name: String,
    pub birth_date: String,
    pub relationship: Option<Relationship>,
    pub profile_picture: Option<String>,
    pub cpf_document: Option<String>,
}

/// The draft record mutated by the wizard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub plan: Option<Plan>,
    pub personal: PersonalInfo,
    pub contact: ContactInfo,
    pub professional: ProfessionalInfo,
    pub dependents: Vec<Dependent>,
    pub signature: Option<String>,
}

impl FormData {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::FullName => &self.personal.full_name,
            TextField::Cpf => &self.personal.cpf,
            TextField::Rg => &self.personal.rg,
            TextField::BirthDate => &self.personal.birth_date,
            TextField::Email => &self.contact.email,
            TextField::Phone => &self.contact.phone,
            TextField::Cep => &self.contact.cep,
            TextField::Street => &self.contact.street,
            TextField::Number => &self.contact.number,
            TextField::Complement => &self.contact.complement,
            TextField::Neighborhood => &self.contact.neighborhood,
            TextField::City => &self.contact.city,
            TextField::State => &self.contact.state,
            TextField::Employer => &self.professional.employer,
            TextField::Profession => &self.professional.profession,
            TextField::AdmissionDate => &self.professional.admission_date,
        }
    }

    pub(crate) fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::FullName => &mut self.personal.full_name,
            TextField::Cpf => &mut self.personal.cpf,
            TextField::Rg => &mut self.personal.rg,
            TextField::BirthDate => &mut self.personal.birth_date,
            TextField::Email => &mut self.contact.email,
            TextField::Phone => &mut self.contact.phone,
            TextField::Cep => &mut self.contact.cep,
            TextField::Street => &mut self.contact.street,
            TextField::Number => &mut self.contact.number,
            TextField::Complement => &mut self.contact.complement,
            TextField::Neighborhood => &mut self.contact.neighborhood,
            TextField::City => &mut self.contact.city,
            TextField::State => &mut self.contact.state,
            TextField::Employer => &mut self.professional.employer,
            TextField::Profession => &mut self.professional.profession,
            TextField::AdmissionDate => &mut self.professional.admission_date,
        }
    }

    pub fn attachment(&self, attachment: Attachment) -> Option<&str> {
        match attachment {
            Attachment::ProfilePicture => self.personal.profile_picture.as_deref(),
            Attachment::PersonalDocument => self.personal.personal_document.as_deref(),
            Attachment::MarriageDocument => self.personal.marriage_document.as_deref(),
            Attachment::ResidenceDocument => self.contact.residence_document.as_deref(),
        }
    }

    pub(crate) fn attachment_mut(&mut self, attachment: Attachment) -> &mut Option<String> {
        match attachment {
            Attachment::ProfilePicture => &mut self.personal.profile_picture,
            Attachment::PersonalDocument => &mut self.personal.personal_document,
            Attachment::MarriageDocument => &mut self.personal.marriage_document,
            Attachment::ResidenceDocument => &mut self.contact.residence_document,
        }
    }

    pub fn is_effective(&self) -> bool {
        self.plan == Some(Plan::Effective)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    /// Only pending proposals can be decided, and only once
    pub fn can_become(&self, next: SubmissionStatus) -> bool {
        *self == SubmissionStatus::Pending && next != SubmissionStatus::Pending
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::Rejected => "REJECTED",
        })
    }
}

/// A finalized enrollment as stored in the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    #[serde(flatten)]
    pub data: FormData,
}

impl Submission {
    pub fn new(id: String, data: FormData) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            status: SubmissionStatus::Pending,
            data,
        }
    }
}
