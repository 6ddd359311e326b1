//! Starter category tree for fresh databases.

use domain_categories::{CategoryError, CategoryRepository, CategoryService, CreateCategory};
use tracing::info;

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    level: i32,
    /// Slug of the parent, resolved to an id at insert time
    parent: Option<&'static str>,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Electronics",
        slug: "electronics",
        level: 100,
        parent: None,
    },
    SeedCategory {
        name: "Smartphones",
        slug: "smartphones",
        level: 200,
        parent: Some("electronics"),
    },
    SeedCategory {
        name: "Laptops",
        slug: "laptops",
        level: 200,
        parent: Some("electronics"),
    },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

/// Insert the starter categories, skipping any whose slug already exists.
///
/// Parents are listed before their children, so each parent slug resolves.
pub async fn seed_categories<R: CategoryRepository>(
    service: &CategoryService<R>,
) -> Result<SeedReport, CategoryError> {
    let mut report = SeedReport::default();

    for entry in CATEGORIES {
        match service.get_by_slug(entry.slug).await {
            Ok(_) => {
                info!(slug = entry.slug, "Category already present, skipping");
                report.skipped += 1;
                continue;
            }
            Err(CategoryError::DoesNotExist(_)) => {}
            Err(e) => return Err(e),
        }

        let mut input = CreateCategory::new(entry.name, entry.slug).active();
        input.level = entry.level;
        if let Some(parent_slug) = entry.parent {
            input.parent_id = Some(service.get_by_slug(parent_slug).await?.id);
        }

        let created = service.create(input).await?;
        info!(category_id = created.id, slug = entry.slug, "Seeded category");
        report.created += 1;
    }

    Ok(report)
}
