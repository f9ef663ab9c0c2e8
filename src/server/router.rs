use hyper::{Method, Uri};

use super::route::Route;

pub fn parse<'a>(method: &Method, uri: &'a Uri) -> Route<'a> {
    if method != Method::GET {
        return Route::Upstream;
    }

    let path = uri.path();
    if path == "/v2/_catalog" {
        return Route::Catalog;
    }

    let Some(rest) = path.strip_prefix("/v2/") else {
        return Route::Upstream;
    };
    let Some(rest) = rest.strip_suffix("/tags/list") else {
        return Route::Upstream;
    };

    let mut segments = rest.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Route::ListTags { owner, name }
        }
        _ => Route::Upstream,
    }
}
