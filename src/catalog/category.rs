use serde::{Deserialize, Serialize};

use crate::database::Record;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Icon name or emoji. The back-office writes it as `icon_name`.
    #[serde(default, alias = "icon_name")]
    pub icon: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, alias = "order_index")]
    pub display_order: i32,
    #[serde(default = "super::active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for Category {
    const TABLE: &'static str = "categories";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Active categories in menu order.
pub fn active_categories(mut categories: Vec<Category>) -> Vec<Category> {
    categories.retain(|category| category.is_active);
    categories.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, order: i32, active: bool) -> Category {
        Category {
            id,
            name: name.to_string(),
            icon: String::new(),
            slug: name.to_lowercase(),
            display_order: order,
            is_active: active,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn ordered_by_display_order_then_name() {
        let sorted = active_categories(vec![
            category(1, "Kafe", 2, true),
            category(2, "Bar", 2, true),
            category(3, "Restoran", 1, true),
            category(4, "Gizli", 0, false),
        ]);
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Restoran", "Bar", "Kafe"]);
    }

    #[test]
    fn reads_back_office_columns() {
        let categories: Vec<Category> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Kafe", "icon_name": "coffee", "order_index": 1, "is_active": true},
                {"id": 2, "name": "Bar", "icon_name": "wine", "order_index": 2, "is_active": true}
            ]"#,
        )
        .unwrap();
        let sorted = active_categories(categories);
        assert_eq!(sorted[0].name, "Kafe");
        assert_eq!(sorted[0].icon, "coffee");
        assert_eq!(sorted[0].display_order, 1);
        assert_eq!(sorted[1].slug, "");
    }
}
