//! Sidebar menu and its permission filter.
//!
//! An entry survives when it declares no permissions, or when any of its
//! permissions is held by the operator. Groups left with no children are
//! dropped.

use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    Group,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: MenuKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
    /// Any one of these grants visibility. Empty means always visible.
    #[serde(skip_serializing_if = "is_unrestricted")]
    pub permissions: &'static [&'static str],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
}

impl MenuEntry {
    fn item(id: &'static str, title: &'static str, url: &'static str) -> Self {
        Self {
            id,
            title,
            kind: MenuKind::Item,
            url: Some(url),
            permissions: &[],
            children: Vec::new(),
        }
    }

    fn group(id: &'static str, title: &'static str, children: Vec<MenuEntry>) -> Self {
        Self {
            id,
            title,
            kind: MenuKind::Group,
            url: None,
            permissions: &[],
            children,
        }
    }

    fn requires(mut self, permissions: &'static [&'static str]) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn is_visible_to(&self, granted: &HashSet<&str>) -> bool {
        self.permissions.is_empty() || self.permissions.iter().any(|p| granted.contains(p))
    }
}

fn is_unrestricted(permissions: &&'static [&'static str]) -> bool {
    permissions.is_empty()
}

const USER_PERMISSIONS: &[&str] = &[
    "view_customuser",
    "add_customuser",
    "change_customuser",
    "delete_customuser",
];

const ROLE_PERMISSIONS: &[&str] = &["view_group", "add_group", "change_group", "delete_group"];

/// The full, unfiltered menu.
pub fn menu_tree() -> Vec<MenuEntry> {
    vec![
        MenuEntry::item("dashboard", "Dashboard", "/dashboard/default"),
        MenuEntry::group(
            "master-tables",
            "Master Tables",
            vec![
                MenuEntry::item("properties", "Properties", "/master/properties"),
                MenuEntry::item("document", "Document", "/master/document"),
                MenuEntry::item("countries", "Countries", "/master/countries"),
                MenuEntry::item("states", "States", "/master/states"),
                MenuEntry::item("cities", "Cities", "/master/cities"),
                MenuEntry::item("ownership-type", "Ownership Type", "/master/ownership-type"),
                MenuEntry::item("bhk-type", "BHK Type", "/master/bhk-type"),
                MenuEntry::item("property-type", "Property Type", "/master/property-type"),
                MenuEntry::item("document-type", "Document Type", "/master/document-type"),
            ],
        ),
        MenuEntry::group(
            "user",
            "User Management",
            vec![MenuEntry::item("user", "User", "/user-role").requires(USER_PERMISSIONS)],
        ),
        MenuEntry::group(
            "role-group",
            "Role Management",
            vec![MenuEntry::item("role", "Role", "/roles").requires(ROLE_PERMISSIONS)],
        ),
    ]
}

/// Keep the entries of `tree` visible to an operator holding `permissions`.
pub fn filter_menu<S: AsRef<str>>(tree: &[MenuEntry], permissions: &[S]) -> Vec<MenuEntry> {
    let granted: HashSet<&str> = permissions.iter().map(AsRef::as_ref).collect();
    filter_entries(tree, &granted)
}

fn filter_entries(entries: &[MenuEntry], granted: &HashSet<&str>) -> Vec<MenuEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_visible_to(granted))
        .filter_map(|entry| match entry.kind {
            MenuKind::Item => Some(entry.clone()),
            MenuKind::Group => {
                let children = filter_entries(&entry.children, granted);
                (!children.is_empty()).then(|| MenuEntry {
                    children,
                    ..entry.clone()
                })
            }
        })
        .collect()
}

/// The menu for an operator holding `permissions`.
pub fn navigation_for<S: AsRef<str>>(permissions: &[S]) -> Vec<MenuEntry> {
    filter_menu(&menu_tree(), permissions)
}
