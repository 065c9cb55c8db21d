use serde::{Deserialize, Serialize};

use crate::database::Record;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Menu section, e.g. "Drinks".
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "super::active_by_default")]
    pub is_available: bool,
    /// Items extracted automatically stay hidden until an admin approves them.
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for MenuItem {
    const TABLE: &'static str = "menu_items";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MenuSection {
    pub category: Option<String>,
    pub items: Vec<MenuItem>,
}

/// A venue's public menu: available and approved items, grouped by section in
/// the order sections first appear. Uncategorised items come last.
pub fn venue_menu(items: &[MenuItem], venue_id: i64) -> Vec<MenuSection> {
    let mut sections: Vec<MenuSection> = Vec::new();
    let mut loose: Vec<MenuItem> = Vec::new();

    let visible = items
        .iter()
        .filter(|item| item.venue_id == venue_id && item.is_available && item.is_approved);
    for item in visible {
        let Some(category) = item.category.as_deref().filter(|c| !c.trim().is_empty()) else {
            loose.push(item.clone());
            continue;
        };
        match sections
            .iter_mut()
            .find(|section| section.category.as_deref() == Some(category))
        {
            Some(section) => section.items.push(item.clone()),
            None => sections.push(MenuSection {
                category: Some(category.to_string()),
                items: vec![item.clone()],
            }),
        }
    }

    if !loose.is_empty() {
        sections.push(MenuSection {
            category: None,
            items: loose,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, venue_id: i64, category: Option<&str>, approved: bool) -> MenuItem {
        MenuItem {
            id,
            venue_id,
            name: format!("item {}", id),
            description: None,
            price: 42.5,
            image_url: None,
            category: category.map(str::to_string),
            is_available: true,
            is_approved: approved,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn groups_visible_items_in_first_seen_order() {
        let mut sold_out = item(6, 1, Some("Tatlı"), true);
        sold_out.is_available = false;
        let items = vec![
            item(1, 1, Some("İçecek"), true),
            item(2, 1, None, true),
            item(3, 1, Some("Ana Yemek"), true),
            item(4, 1, Some("İçecek"), true),
            item(5, 1, Some("Ana Yemek"), false),
            item(7, 2, Some("İçecek"), true),
            sold_out,
        ];
        let menu = venue_menu(&items, 1);
        let shape: Vec<(Option<&str>, Vec<i64>)> = menu
            .iter()
            .map(|s| (s.category.as_deref(), s.items.iter().map(|i| i.id).collect()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (Some("İçecek"), vec![1, 4]),
                (Some("Ana Yemek"), vec![3]),
                (None, vec![2]),
            ]
        );
    }
}
