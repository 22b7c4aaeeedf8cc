//! Tapp tree model and flattening.
//!
//! The backend returns tapps grouped into categories. Bit 0 of a node's `type` marks a tapp; any
//! other node is a category whose `tapps` array holds further nodes.

use chayns_host::TappLaunch;
use serde::{Deserialize, Serialize};

use crate::{
    config::RuntimeConfig,
    de::{lenient_i64, lenient_opt_i64, null_as_default},
};

const TAPP_TYPE_BIT: u32 = 1;

/// A tapp leaf as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tapp {
    /// Tapp id.
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    /// Internal (technical) name.
    #[serde(deserialize_with = "null_as_default")]
    pub internal_name: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub show_name: String,
    /// Menu sort key.
    #[serde(deserialize_with = "lenient_i64")]
    pub sort_id: i64,
    /// Whether the tapp takes over the full page.
    #[serde(deserialize_with = "null_as_default")]
    pub exclusive_view: bool,
    /// Content URL.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Short link name.
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
    /// UAC groups allowed to see the tapp.
    #[serde(deserialize_with = "null_as_default")]
    pub uac_group_ids: Vec<i64>,
    /// Whether the tapp is hidden from the navigation menu.
    #[serde(deserialize_with = "null_as_default")]
    pub hide_from_menu: bool,
    /// Visible on mobile devices.
    #[serde(deserialize_with = "null_as_default")]
    pub mobile: bool,
    /// Visible on desktop devices.
    #[serde(deserialize_with = "null_as_default")]
    pub desktop: bool,
    /// Icon identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    /// Tapp shown when this one cannot be loaded.
    #[serde(deserialize_with = "lenient_opt_i64")]
    pub fallback_tapp: Option<i64>,
    /// Whether a signed-in user is required.
    #[serde(deserialize_with = "null_as_default")]
    pub requires_login: bool,
    /// Load the content inline instead of in a frame.
    #[serde(deserialize_with = "null_as_default")]
    pub load_as_ajax: bool,
    /// Send the authentication header to the tapp URL.
    #[serde(deserialize_with = "null_as_default")]
    pub send_authentication_header: bool,
    /// Post the access token to the tapp URL.
    #[serde(deserialize_with = "null_as_default")]
    pub post_tobit_access_token: bool,
    /// Only listed while admin mode is active.
    #[serde(deserialize_with = "null_as_default")]
    pub show_only_in_admin_mode: bool,
    /// Legacy exclusive-view flag.
    #[serde(deserialize_with = "null_as_default")]
    pub is_exclusive_view: bool,
}

impl Tapp {
    /// Synthetic login tapp appended to every tapp list.
    pub fn login(config: &RuntimeConfig) -> Self {
        Self {
            id: config.login_tapp_id,
            internal_name: "login".to_string(),
            show_name: "Login".to_string(),
            url: config.login_tapp_url.clone(),
            hide_from_menu: true,
            mobile: true,
            desktop: true,
            ..Default::default()
        }
    }

    /// Builds the descriptor passed to the tapp presenter.
    pub fn launch(&self) -> TappLaunch {
        TappLaunch {
            tapp_id: self.id,
            show_name: self.show_name.clone(),
            url: self.url.clone(),
            exclusive_view: self.exclusive_view,
            post_access_token: self.post_tobit_access_token,
        }
    }
}

/// One node of the backend tapp tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTappNode")]
pub enum TappNode {
    /// Grouping node.
    Category {
        /// Nested nodes in display order.
        children: Vec<TappNode>,
    },
    /// A tapp.
    Leaf(Tapp),
}

impl TappNode {
    /// Creates a category node.
    pub fn category(children: Vec<TappNode>) -> Self {
        Self::Category { children }
    }

    /// Creates a leaf node.
    pub fn leaf(tapp: Tapp) -> Self {
        Self::Leaf(tapp)
    }
}

#[derive(Deserialize)]
struct RawTappNode {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    kind: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    tapps: Vec<RawTappNode>,
    #[serde(flatten)]
    tapp: Tapp,
}

impl From<RawTappNode> for TappNode {
    fn from(raw: RawTappNode) -> Self {
        if raw.kind & TAPP_TYPE_BIT == TAPP_TYPE_BIT {
            Self::Leaf(raw.tapp)
        } else {
            Self::Category {
                children: raw.tapps.into_iter().map(Self::from).collect(),
            }
        }
    }
}

/// Flattens `nodes` into their leaves, depth-first and left to right, then appends `login_tapp`.
///
/// Duplicates are kept: a tapp listed under two categories appears twice.
pub fn flatten_tapps(nodes: &[TappNode], login_tapp: &Tapp) -> Vec<Tapp> {
    let mut tapps = Vec::new();
    collect_leaves(nodes, &mut tapps);
    tapps.push(login_tapp.clone());
    tapps
}

fn collect_leaves(nodes: &[TappNode], out: &mut Vec<Tapp>) {
    for node in nodes {
        match node {
            TappNode::Leaf(tapp) => out.push(tapp.clone()),
            TappNode::Category { children } => collect_leaves(children, out),
        }
    }
}

/// Finds the first tapp with `tapp_id`.
pub fn find_tapp(tapps: &[Tapp], tapp_id: i64) -> Option<&Tapp> {
    tapps.iter().find(|tapp| tapp.id == tapp_id)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tapp(id: i64) -> Tapp {
        Tapp {
            id,
            show_name: format!("Tapp {id}"),
            ..Default::default()
        }
    }

    fn ids(tapps: &[Tapp]) -> Vec<i64> {
        tapps.iter().map(|tapp| tapp.id).collect()
    }

    #[test]
    fn empty_tree_yields_only_login() {
        let login = Tapp::login(&RuntimeConfig::default());
        assert_eq!(flatten_tapps(&[], &login), vec![login.clone()]);
    }

    #[test]
    fn keeps_depth_first_order_and_appends_login_last() {
        let login = Tapp::login(&RuntimeConfig::default());
        let tree = vec![
            TappNode::leaf(tapp(1)),
            TappNode::category(vec![
                TappNode::leaf(tapp(2)),
                TappNode::category(vec![TappNode::leaf(tapp(3))]),
                TappNode::leaf(tapp(4)),
            ]),
            TappNode::category(Vec::new()),
            TappNode::leaf(tapp(5)),
        ];
        assert_eq!(ids(&flatten_tapps(&tree, &login)), vec![1, 2, 3, 4, 5, login.id]);
    }

    #[test]
    fn duplicates_are_kept() {
        let login = Tapp::login(&RuntimeConfig::default());
        let tree = vec![
            TappNode::category(vec![TappNode::leaf(tapp(9))]),
            TappNode::category(vec![TappNode::leaf(tapp(9))]),
        ];
        assert_eq!(ids(&flatten_tapps(&tree, &login)), vec![9, 9, login.id]);
    }

    #[test]
    fn deserializes_type_bit_flag() {
        let nodes: Vec<TappNode> = serde_json::from_value(json!([
            {
                "type": 2,
                "showName": "Category",
                "tapps": [
                    { "type": 1, "id": 10, "showName": "News", "url": "https://news", "uacGroupIds": null },
                    { "type": 3, "id": 11, "showName": "Shop", "requiresLogin": true, "icon": null }
                ]
            },
            { "type": 0, "tapps": null },
            { "type": 5, "id": 12, "internalName": "chat", "exclusiveView": true }
        ]))
        .expect("tree");

        let login = Tapp::login(&RuntimeConfig::default());
        let flat = flatten_tapps(&nodes, &login);
        assert_eq!(ids(&flat), vec![10, 11, 12, login.id]);
        assert_eq!(flat[0].url, "https://news");
        assert!(flat[1].requires_login);
        assert!(flat[2].exclusive_view);
        assert_eq!(flat[2].internal_name, "chat");
    }

    #[test]
    fn null_scalars_fall_back_to_defaults() {
        let nodes: Vec<TappNode> = serde_json::from_value(json!([
            { "type": 1, "id": 10, "hideFromMenu": null, "exclusiveView": null, "mobile": null },
            { "type": 1, "id": 11, "sortId": null, "requiresLogin": null, "fallbackTapp": null },
            { "type": 1, "id": "12", "sortId": "3", "fallbackTapp": "10", "loadAsAjax": null },
            { "type": null, "tapps": [{ "type": 1, "id": 13, "desktop": null }] }
        ]))
        .expect("tree");

        let login = Tapp::login(&RuntimeConfig::default());
        let flat = flatten_tapps(&nodes, &login);
        assert_eq!(ids(&flat), vec![10, 11, 12, 13, login.id]);
        assert!(!flat[0].hide_from_menu);
        assert!(!flat[0].exclusive_view);
        assert_eq!(flat[1].sort_id, 0);
        assert_eq!(flat[1].fallback_tapp, None);
        assert!(!flat[1].requires_login);
        assert_eq!(flat[2].sort_id, 3);
        assert_eq!(flat[2].fallback_tapp, Some(10));
    }

    #[test]
    fn finds_first_matching_tapp() {
        let tapps = vec![tapp(1), tapp(2)];
        assert_eq!(find_tapp(&tapps, 2).map(|t| t.id), Some(2));
        assert!(find_tapp(&tapps, 3).is_none());
    }
}
