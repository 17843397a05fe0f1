// Paged collection queries.
//
// The server pages with `?page=&size=&sort=` and reports the total in
// `X-Total-Count` plus navigation in an RFC 5988 `Link` header:
//   <api/wishlists?page=1&size=20>; rel="next",<api/wishlists?page=4&size=20>; rel="last"

use reqwest::header::HeaderMap;

/// Query parameters for a paged collection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    /// `property,asc|desc` entries, sent as repeated `sort` params.
    pub sort: Vec<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: vec!["id,asc".into()],
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        pairs.extend(self.sort.iter().map(|s| ("sort", s.clone())));
        pairs
    }
}

/// Page numbers advertised by the `Link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub first: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: Option<u32>,
}

impl PageLinks {
    /// Parse a `Link` header value. Unknown rels and malformed entries are skipped.
    /// Entries are split on their `<...>` targets; a target may itself
    /// contain commas (`sort=id,asc`).
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();
        let mut rest = header;
        while let Some(open) = rest.find('<') {
            let after_open = &rest[open + 1..];
            let Some(close) = after_open.find('>') else {
                break;
            };
            let target = &after_open[..close];
            let tail = &after_open[close + 1..];
            let params_end = tail.find('<').unwrap_or(tail.len());
            let params = &tail[..params_end];
            rest = &tail[params_end..];

            let Some(page) = page_param(target) else {
                continue;
            };
            for section in params.split([';', ',']) {
                let Some(rel) = section.trim().strip_prefix("rel=") else {
                    continue;
                };
                match rel.trim_matches('"') {
                    "first" => links.first = Some(page),
                    "prev" => links.prev = Some(page),
                    "next" => links.next = Some(page),
                    "last" => links.last = Some(page),
                    _ => {}
                }
            }
        }
        links
    }
}

fn page_param(target: &str) -> Option<u32> {
    let (_, query) = target.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// One page of a collection, plus the paging metadata from the headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: Option<u64>,
    pub links: PageLinks,
}

impl<T> Page<T> {
    pub(crate) fn from_headers(items: Vec<T>, headers: &HeaderMap) -> Self {
        let total_count = headers
            .get("x-total-count")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let links = headers
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(PageLinks::parse)
            .unwrap_or_default();
        Self {
            items,
            total_count,
            links,
        }
    }

    pub fn has_next(&self) -> bool {
        self.links.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_rels() {
        let header = "<api/wishlists?page=2&size=20>; rel=\"next\",\
                      <api/wishlists?page=0&size=20>; rel=\"prev\",\
                      <api/wishlists?page=4&size=20>; rel=\"last\",\
                      <api/wishlists?page=0&size=20>; rel=\"first\"";
        let links = PageLinks::parse(header);
        assert_eq!(
            links,
            PageLinks {
                first: Some(0),
                prev: Some(0),
                next: Some(2),
                last: Some(4),
            }
        );
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let links = PageLinks::parse("garbage, <api/wishes?size=5>; rel=\"next\", <x?page=3>; rel=\"last\"");
        assert_eq!(links.next, None);
        assert_eq!(links.last, Some(3));
    }

    #[test]
    fn sort_commas_inside_targets_do_not_split_entries() {
        let header = "<api/wishes?page=1&size=20&sort=id,asc>; rel=\"next\",\
                      <api/wishes?page=6&size=20&sort=id,asc&sort=name,desc>; rel=\"last\"";
        let links = PageLinks::parse(header);
        assert_eq!(links.next, Some(1));
        assert_eq!(links.last, Some(6));
        assert_eq!(links.first, None);
    }

    #[test]
    fn default_request_sorts_by_id() {
        let pairs = PageRequest::default().query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "0".to_string()),
                ("size", "20".to_string()),
                ("sort", "id,asc".to_string()),
            ]
        );
    }
}
