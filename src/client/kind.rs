use crate::api::ContentType;
use crate::errors::Error;

/// The three client surfaces. They share one implementation and differ only
/// in default content type, accepted content types and which operations exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientKind {
    Delivery,
    Preview,
    Management,
}

/// Operations whose availability varies by client kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    Graphql,
    GetTypes,
    GetType,
    GetTaxonomies,
    QueryTaxonomies,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Graphql => "graphql",
            Operation::GetTypes => "get_types",
            Operation::GetType => "get_type",
            Operation::GetTaxonomies => "get_taxonomies",
            Operation::QueryTaxonomies => "query_taxonomies",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Support {
    Available,
    NotSupported,
    Unimplemented,
}

impl ClientKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientKind::Delivery => "delivery",
            ClientKind::Preview => "preview",
            ClientKind::Management => "management",
        }
    }

    /// Content types a call may select.
    pub fn valid_content_types(self) -> &'static [ContentType] {
        match self {
            ClientKind::Delivery => &[ContentType::Published],
            ClientKind::Preview => &[ContentType::Preview],
            ClientKind::Management => &[ContentType::Published, ContentType::Draft],
        }
    }

    /// Client-wide content type. Only management honours a configured value.
    pub(crate) fn default_content_type(self, configured: Option<&str>) -> ContentType {
        match self {
            ClientKind::Delivery => ContentType::Published,
            ClientKind::Preview => ContentType::Preview,
            ClientKind::Management => match configured {
                Some(ct) if ct.eq_ignore_ascii_case("published") => ContentType::Published,
                _ => ContentType::Draft,
            },
        }
    }

    fn support(self, op: Operation) -> Support {
        use Operation::*;
        match (self, op) {
            (ClientKind::Delivery, Graphql | GetTaxonomies) => Support::Available,
            (ClientKind::Delivery, GetTypes | GetType | QueryTaxonomies) => Support::NotSupported,
            (ClientKind::Preview, Graphql) => Support::Available,
            (ClientKind::Preview, GetTypes | GetType | GetTaxonomies | QueryTaxonomies) => {
                Support::Unimplemented
            }
            (ClientKind::Management, Graphql) => Support::NotSupported,
            (ClientKind::Management, _) => Support::Available,
        }
    }

    pub(crate) fn ensure(self, op: Operation) -> Result<(), Error> {
        match self.support(op) {
            Support::Available => Ok(()),
            Support::NotSupported => Err(Error::NotSupported(op.name())),
            Support::Unimplemented => Err(Error::Unimplemented(op.name())),
        }
    }
}
