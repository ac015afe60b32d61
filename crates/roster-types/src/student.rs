//! Student types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Student record as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub course: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a new student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub course: String,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        course: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            course: course.into(),
        }
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
}

impl StudentPatch {
    /// Build a patch from raw prompt answers. Only an empty answer means
    /// "unchanged"; anything else, whitespace included, is stored as typed.
    pub fn from_input(name: &str, email: &str, course: &str) -> Self {
        fn keep_if_set(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        Self {
            name: keep_if_set(name),
            email: keep_if_set(email),
            course: keep_if_set(course),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.course.is_none()
    }

    /// Apply the supplied fields onto an existing record
    pub fn apply(&self, student: &mut Student) {
        if let Some(ref name) = self.name {
            student.name = name.clone();
        }
        if let Some(ref email) = self.email {
            student.email = email.clone();
        }
        if let Some(ref course) = self.course {
            student.course = course.clone();
        }
    }
}

/// Cache key for a student id
pub fn student_cache_key(id: i32) -> String {
    format!("student:{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Student {
        Student {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            course: "Physics".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_is_unchanged() {
        let patch = StudentPatch::from_input("", "", "");
        assert!(patch.is_empty());

        let patch = StudentPatch::from_input("", "new@example.com", "");
        assert_eq!(patch.email.as_deref(), Some("new@example.com"));
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_input_is_kept_literally() {
        let patch = StudentPatch::from_input("  Bob ", " ", "");
        assert_eq!(patch.name.as_deref(), Some("  Bob "));
        assert_eq!(patch.email.as_deref(), Some(" "));
        assert!(patch.course.is_none());

        let mut student = sample();
        patch.apply(&mut student);
        assert_eq!(student.name, "  Bob ");
        assert_eq!(student.email, " ");
        assert_eq!(student.course, "Physics");
    }

    #[test]
    fn test_apply_keeps_unsupplied_fields() {
        let mut student = sample();
        let patch = StudentPatch {
            course: Some("Chemistry".to_string()),
            ..Default::default()
        };
        patch.apply(&mut student);

        assert_eq!(student.course, "Chemistry");
        assert_eq!(student.name, "Ana");
        assert_eq!(student.email, "ana@example.com");
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(student_cache_key(42), "student:42");
    }

    #[test]
    fn test_json_keeps_timestamp() {
        let student = sample();
        let json = serde_json::to_string(&student).unwrap();
        let back: Student = serde_json::from_str(&json).unwrap();
        assert_eq!(back, student);
    }
}
