use std::fmt;

use super::gateway::GatewayError;

/// Everything that went wrong with a submission, ready for the error modal.
///
/// Always holds at least one message so the UI has a single rendering path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    messages: Vec<String>,
}

impl SubmissionFailure {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn from_messages<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            Self::single("The application could not be submitted.")
        } else {
            Self { messages }
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl From<GatewayError> for SubmissionFailure {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Rejected { messages } => Self::from_messages(
                messages
                    .iter()
                    .map(|message| friendly_message(message))
                    .collect::<Vec<_>>(),
            ),
            GatewayError::Unavailable(message) => Self::single(message),
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join("; "))
    }
}

impl std::error::Error for SubmissionFailure {}

/// Rewrite raw field paths inside a service message into readable labels.
///
/// `residenceHistory.0.City is required` becomes `Residence History #1: City is required`;
/// bracketed indexes (`occupants[1].dob`) work the same way. Text without a field path is
/// returned unchanged.
pub fn friendly_message(raw: &str) -> String {
    raw.trim()
        .split(' ')
        .map(rewrite_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn rewrite_token(token: &str) -> String {
    let (body, suffix) = split_trailing_punctuation(token);
    match field_path_label(body) {
        // A colon after a path is redundant once the label carries its own separators.
        Some(label) if suffix == ":" => label,
        Some(label) => format!("{label}{suffix}"),
        None => token.to_string(),
    }
}

fn split_trailing_punctuation(token: &str) -> (&str, &str) {
    let body = token.trim_end_matches([':', ',', '.', ';']);
    (body, &token[body.len()..])
}

fn field_path_label(token: &str) -> Option<String> {
    if !token.contains(['.', '[']) {
        return None;
    }

    let normalised = token.replace('[', ".").replace(']', "");
    let segments: Vec<&str> = normalised.split('.').collect();
    if segments.len() < 2 || segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    if !segments
        .iter()
        .all(|segment| is_index(segment) || is_identifier(segment))
    {
        return None;
    }
    if is_index(segments[0]) {
        return None;
    }
    if section_label(segments[0]).is_none() && !is_index(segments[1]) {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for (position, segment) in segments.iter().enumerate() {
        if let Some(index) = segment.parse::<usize>().ok().filter(|_| is_index(segment)) {
            if let Some(last) = parts.last_mut() {
                last.push_str(&format!(" #{}", index + 1));
            }
        } else if position == 0 {
            parts.push(
                section_label(segment)
                    .map(str::to_string)
                    .unwrap_or_else(|| humanize(segment)),
            );
        } else {
            parts.push(humanize(segment));
        }
    }
    Some(parts.join(": "))
}

fn section_label(segment: &str) -> Option<&'static str> {
    let label = match segment {
        "residenceHistory" | "residences" => "Residence History",
        "incomeHistory" | "incomes" | "income" => "Income",
        "occupants" => "Occupant",
        "pets" => "Pet",
        "vehicles" => "Vehicle",
        "emergencyContacts" => "Emergency Contact",
        "documents" => "Document",
        "applicant" => "Applicant",
        _ => return None,
    };
    Some(label)
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `moveInDate` -> `Move In Date`, `zip_code` -> `Zip Code`. Acronym runs stay intact.
fn humanize(identifier: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for c in identifier.chars() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }
        let boundary = c.is_ascii_uppercase()
            && matches!(previous, Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit());
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        previous = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
