use crate::Error;

/// Opaque comment identifier
///
/// The server hands out integers, but clients never look inside: the id is
/// accepted as either a JSON string or a JSON integer and always sent back as
/// a string.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for CommentId {
    fn from(id: i64) -> CommentId {
        CommentId(id.to_string())
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for CommentId {
    fn deserialize<D>(deserializer: D) -> Result<CommentId, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Str(String),
            Signed(i64),
            Unsigned(u64),
        }
        Ok(CommentId(match RawId::deserialize(deserializer)? {
            RawId::Str(s) => s,
            RawId::Signed(i) => i.to_string(),
            RawId::Unsigned(u) => u.to_string(),
        }))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub message: String,
}

impl Comment {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Comment {
        Comment {
            id: CommentId(id.into()),
            message: message.into(),
        }
    }
}

/// Form body of `POST /delete-comment`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DeleteComment {
    pub id: CommentId,
}

/// Form body of `POST /contact-me`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    #[serde(rename = "name-input", default)]
    pub name: String,

    #[serde(rename = "email-input", default)]
    pub email: String,

    #[serde(rename = "subject-input", default)]
    pub subject: String,

    #[serde(rename = "message-input", default)]
    pub message: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("name-input", &self.name),
            ("email-input", &self.email),
            ("subject-input", &self.subject),
            ("message-input", &self.message),
        ] {
            if value.is_empty() {
                return Err(Error::MissingField(String::from(field)));
            }
        }
        Ok(())
    }
}
