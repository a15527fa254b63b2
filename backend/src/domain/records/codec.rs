//! Translation between stored documents and typed records.
//!
//! Keys are camelCase. Decoding tolerates the data older clients wrote:
//! capitalised status and priority values, a missing `feedbacks` field and
//! `submittedOn` dates in the browser's locale format.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::ports::{Document, StoredDocument};
use crate::domain::{
    Category, Complaint, ComplaintDraft, ContactNumber, Department, Email, Feedback, PersonName,
    RecordId, Role, Status, Suggestion, SuggestionDraft, User, UserId, UserProfile,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    user_id: String,
    first_name: String,
    last_name: String,
    email: String,
    contact_number: String,
    department: String,
    user_type: String,
}

/// Date layouts accepted in `submittedOn`, tried in order. Slash dates are
/// read month first, as the default US locale writes them.
const SUBMITTED_ON_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%d-%m-%Y"];

fn parse_submitted_on(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    SUBMITTED_ON_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn submitted_on<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_submitted_on(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised submittedOn date '{raw}'")))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComplaintDocument {
    title: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    #[serde(deserialize_with = "submitted_on")]
    submitted_on: NaiveDate,
    user_id: String,
    #[serde(default)]
    feedbacks: Vec<Feedback>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionDocument {
    title: String,
    description: String,
    #[serde(deserialize_with = "submitted_on")]
    submitted_on: NaiveDate,
    user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AdminDocument {
    email: String,
}

fn to_document<T: Serialize>(value: &T) -> Result<Document, String> {
    match serde_json::to_value(value).map_err(|err| err.to_string())? {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected an object, got {other}")),
    }
}

fn from_document<T: for<'de> Deserialize<'de>>(data: &Document) -> Result<T, String> {
    serde_json::from_value(Value::Object(data.clone())).map_err(|err| err.to_string())
}

fn record_id(stored: &StoredDocument) -> Result<RecordId, String> {
    RecordId::new(stored.id.as_str()).map_err(|err| err.to_string())
}

pub(super) fn encode_user(user: &User) -> Result<Document, String> {
    to_document(&UserDocument {
        user_id: user.id().to_string(),
        first_name: user.first_name().as_ref().to_owned(),
        last_name: user.last_name().as_ref().to_owned(),
        email: user.email().to_string(),
        contact_number: user.contact_number().as_ref().to_owned(),
        department: user.department().as_ref().to_owned(),
        user_type: user.role().as_str().to_owned(),
    })
}

pub(super) fn decode_user(stored: &StoredDocument) -> Result<User, String> {
    let doc: UserDocument = from_document(&stored.data)?;
    // The document id is authoritative; the embedded copy is informational.
    let id = UserId::new(&stored.id).map_err(|err| err.to_string())?;
    let profile = UserProfile {
        first_name: PersonName::new(&doc.first_name, "firstName").map_err(|e| e.to_string())?,
        last_name: PersonName::new(&doc.last_name, "lastName").map_err(|e| e.to_string())?,
        email: Email::new(&doc.email).map_err(|e| e.to_string())?,
        contact_number: ContactNumber::new(&doc.contact_number).map_err(|e| e.to_string())?,
        department: Department::new(&doc.department).map_err(|e| e.to_string())?,
        role: doc.user_type.parse::<Role>().map_err(|e| e.to_string())?,
    };
    Ok(User::new(id, profile))
}

pub(super) fn encode_new_complaint(
    owner: &UserId,
    draft: &ComplaintDraft,
    submitted_on: NaiveDate,
) -> Result<Document, String> {
    to_document(&ComplaintDocument {
        title: draft.title.clone(),
        description: draft.description.clone(),
        category: draft.category.to_string(),
        priority: draft.priority.as_str().to_owned(),
        status: Status::Unresolved.as_str().to_owned(),
        submitted_on,
        user_id: owner.to_string(),
        feedbacks: Vec::new(),
    })
}

pub(super) fn decode_complaint(stored: &StoredDocument) -> Result<Complaint, String> {
    let doc: ComplaintDocument = from_document(&stored.data)?;
    let owner = UserId::new(&doc.user_id).map_err(|err| err.to_string())?;
    let draft = ComplaintDraft {
        title: doc.title,
        description: doc.description,
        category: Category::new(&doc.category).map_err(|err| err.to_string())?,
        priority: doc.priority.parse().map_err(|err| format!("{err}"))?,
    };
    let status: Status = doc.status.parse().map_err(|err| format!("{err}"))?;
    Ok(
        Complaint::new(record_id(stored)?, owner, draft, doc.submitted_on)
            .with_status(status)
            .with_feedbacks(doc.feedbacks)
            .with_revision(stored.revision),
    )
}

pub(super) fn status_patch(status: Status) -> Document {
    let mut patch = Document::new();
    patch.insert("status".into(), Value::String(status.as_str().to_owned()));
    patch
}

pub(super) fn feedbacks_patch(feedbacks: &[Feedback]) -> Result<Document, String> {
    let encoded = serde_json::to_value(feedbacks).map_err(|err| err.to_string())?;
    let mut patch = Document::new();
    patch.insert("feedbacks".into(), encoded);
    Ok(patch)
}

pub(super) fn encode_new_suggestion(
    owner: &UserId,
    draft: &SuggestionDraft,
    submitted_on: NaiveDate,
) -> Result<Document, String> {
    to_document(&SuggestionDocument {
        title: draft.title.clone(),
        description: draft.description.clone(),
        submitted_on,
        user_id: owner.to_string(),
    })
}

pub(super) fn decode_suggestion(stored: &StoredDocument) -> Result<Suggestion, String> {
    let doc: SuggestionDocument = from_document(&stored.data)?;
    let owner = UserId::new(&doc.user_id).map_err(|err| err.to_string())?;
    let draft = SuggestionDraft {
        title: doc.title,
        description: doc.description,
    };
    Ok(Suggestion::new(
        record_id(stored)?,
        owner,
        draft,
        doc.submitted_on,
    ))
}

pub(super) fn encode_admin(email: &Email) -> Result<Document, String> {
    to_document(&AdminDocument {
        email: email.to_string(),
    })
}
