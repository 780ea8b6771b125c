use super::{ContentApi, ContentVersion};

/// Inputs for a single-item path.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemPath<'a> {
    pub id: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub language: Option<&'a str>,
    pub asset_version: Option<&'a str>,
    pub use_aggregate: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ItemListPath<'a> {
    pub types: Option<&'a str>,
    pub use_aggregate: Option<&'a str>,
}

#[derive(Clone, Copy, Debug)]
pub struct BulkItemsPath<'a> {
    pub ids: &'a [String],
    pub use_aggregate: Option<&'a str>,
    pub language: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RecommendationPath<'a> {
    pub id: Option<&'a str>,
    pub api_name: Option<&'a str>,
}

impl ContentApi {
    pub fn resolve_get_item_path(&self, args: &ItemPath<'_>) -> String {
        match self.version {
            ContentVersion::V1 => format!(
                "/items/{}{}",
                args.id.unwrap_or_default(),
                if args.use_aggregate.is_some() { "/aggregate" } else { "" }
            ),
            ContentVersion::V1_1 => {
                let language = args
                    .language
                    .filter(|lang| !lang.is_empty())
                    .map(|lang| format!("/variations/language/{}?fields=all", lang))
                    .unwrap_or_default();
                let next_param = if language.is_empty() { '?' } else { '&' };
                let aggregate = args
                    .use_aggregate
                    .map(|expand| format!("{}expand={}", next_param, expand))
                    .unwrap_or_default();
                // a language variation cannot also name a version
                let version = match (language.is_empty(), args.asset_version) {
                    (true, Some(v)) if !v.is_empty() => format!("/versions/{}", v),
                    _ => String::new(),
                };
                let identifier = match (args.id, args.slug) {
                    (Some(id), _) => id.to_string(),
                    (None, Some(slug)) => format!(".by.slug/{}", slug),
                    (None, None) => String::new(),
                };
                format!("/items/{}{}{}{}", identifier, version, language, aggregate)
            }
        }
    }

    pub fn resolve_get_item_list_path(&self, args: &ItemListPath<'_>) -> String {
        match self.version {
            ContentVersion::V1 => format!(
                "/items{}{}",
                if args.use_aggregate.is_some() { "/aggregate" } else { "" },
                args.types
                    .map(|t| format!("?field:type:equals={}", t))
                    .unwrap_or_default()
            ),
            ContentVersion::V1_1 => {
                let mut path = String::from("/items");
                let mut join = '?';
                if let Some(types) = args.types {
                    path.push_str(&format!("{}field:type:equals={}", join, types));
                    join = '&';
                }
                if args.use_aggregate.is_some() {
                    path.push_str(&format!("{}expand=\"all\"", join));
                }
                path
            }
        }
    }

    pub fn resolve_search_path(&self) -> String {
        match self.version {
            ContentVersion::V1 => "/items/queries".to_string(),
            ContentVersion::V1_1 => "/items".to_string(),
        }
    }

    pub fn resolve_get_bulk_item_list_path(&self, args: &BulkItemsPath<'_>) -> String {
        match self.version {
            ContentVersion::V1 => format!(
                "/items/bulk{}?ids={}",
                if args.use_aggregate.is_some() { "/aggregate" } else { "" },
                args.ids.join(",")
            ),
            ContentVersion::V1_1 => {
                let id_query = format!("(id eq \"{}\")", args.ids.join("\" or id eq \""));
                match args.language.filter(|lang| !lang.is_empty()) {
                    Some(lang) => format!("/items?q=({} and (language eq \"{}\"))", id_query, lang),
                    None => format!("/items?q={}", id_query),
                }
            }
        }
    }

    pub fn resolve_query_taxonomy_categories_path(&self, taxonomy_id: &str) -> String {
        format!("/taxonomies/{}/categories", taxonomy_id)
    }

    pub fn resolve_get_taxonomies_path(&self) -> String {
        "/taxonomies".to_string()
    }

    pub fn resolve_get_recommendation_path(&self, args: &RecommendationPath<'_>) -> String {
        match (args.id, args.api_name) {
            (Some(id), _) => format!("/personalization/recommendationResults/.by.id/{}", id),
            (None, api_name) => format!(
                "/personalization/recommendationResults/{}",
                api_name.unwrap_or_default()
            ),
        }
    }

    pub fn resolve_get_types_path(&self) -> String {
        "/types".to_string()
    }

    pub fn resolve_get_type_path(&self, type_name: &str) -> String {
        format!("/types/{}", type_name)
    }
}
