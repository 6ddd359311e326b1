use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Level assigned to a category when none is given (root level)
pub const ROOT_LEVEL: i32 = 100;

/// Category as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    /// Depth marker; children use a higher level than their parent
    pub level: i32,
    pub parent_id: Option<i32>,
}

fn default_level() -> i32 {
    ROOT_LEVEL
}

/// DTO for creating a new category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100, message = "length must be between 1 and 100"))]
    pub name: String,

    #[validate(length(min = 1, max = 120, message = "length must be between 1 and 120"))]
    pub slug: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default = "default_level")]
    #[schema(default = 100)]
    pub level: i32,

    #[serde(default)]
    pub parent_id: Option<i32>,
}

impl CreateCategory {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            is_active: false,
            level: ROOT_LEVEL,
            parent_id: None,
        }
    }

    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }

    pub fn under(mut self, parent_id: i32, level: i32) -> Self {
        self.parent_id = Some(parent_id);
        self.level = level;
        self
    }
}

/// DTO for replacing a category.
///
/// Every field is written; omitted optional fields fall back to their
/// defaults rather than keeping the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100, message = "length must be between 1 and 100"))]
    pub name: String,

    #[validate(length(min = 1, max = 120, message = "length must be between 1 and 120"))]
    pub slug: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default = "default_level")]
    #[schema(default = 100)]
    pub level: i32,

    #[serde(default)]
    pub parent_id: Option<i32>,
}

impl From<CreateCategory> for UpdateCategory {
    fn from(input: CreateCategory) -> Self {
        Self {
            name: input.name,
            slug: input.slug,
            is_active: input.is_active,
            level: input.level,
            parent_id: input.parent_id,
        }
    }
}

impl Category {
    /// Full replace, keeping only the id
    pub fn replace_with(&mut self, input: UpdateCategory) {
        self.name = input.name;
        self.slug = input.slug;
        self.is_active = input.is_active;
        self.level = input.level;
        self.parent_id = input.parent_id;
    }
}

/// Body returned by DELETE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDeleted {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryDeleted {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_category_defaults() {
        let input: CreateCategory =
            serde_json::from_str(r#"{"name": "test category", "slug": "test-slug"}"#).unwrap();

        assert_eq!(input.name, "test category");
        assert!(!input.is_active);
        assert_eq!(input.level, 100);
        assert_eq!(input.parent_id, None);
    }

    #[test]
    fn test_create_category_rejects_non_string_name() {
        let result = serde_json::from_str::<CreateCategory>(r#"{"name": 123, "slug": "test-slug"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_length_limits() {
        assert!(CreateCategory::new("a".repeat(100), "b".repeat(120)).validate().is_ok());
        assert!(CreateCategory::new("", "slug").validate().is_err());
        assert!(CreateCategory::new("a".repeat(101), "slug").validate().is_err());
        assert!(CreateCategory::new("name", "b".repeat(121)).validate().is_err());
    }

    #[test]
    fn test_replace_with_overwrites_everything_but_id() {
        let mut category = Category {
            id: 7,
            name: "Phones".into(),
            slug: "phones".into(),
            is_active: true,
            level: 200,
            parent_id: Some(1),
        };

        let update: UpdateCategory =
            serde_json::from_str(r#"{"name": "Mobile", "slug": "mobile"}"#).unwrap();
        category.replace_with(update);

        assert_eq!(category.id, 7);
        assert_eq!(category.name, "Mobile");
        assert!(!category.is_active);
        assert_eq!(category.level, 100);
        assert_eq!(category.parent_id, None);
    }

    #[test]
    fn test_deleted_body_is_id_and_name() {
        let deleted = CategoryDeleted { id: 5, name: "Electronics".into() };
        assert_eq!(
            serde_json::to_value(deleted).unwrap(),
            serde_json::json!({"id": 5, "name": "Electronics"})
        );
    }
}
