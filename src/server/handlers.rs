use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::{ApiError, Error, ErrorEnvelope};
use super::response::Body;
use super::ServerContext;

#[derive(Debug, Serialize)]
struct Catalog {
    repositories: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TagList {
    name: String,
    tags: Vec<String>,
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    let body = serde_json::to_vec(body).map_err(|err| Error::Execution(err.to_string()))?;

    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::fixed(body))?;

    Ok(response)
}

/// `GET /v2/_catalog`
///
/// Fans out `list_packages` across the configured identities in declaration
/// order, one call at a time, and composes the deduplicated repository list.
/// A single successful identity is enough for a 200; errors gathered next to
/// successes are logged and dropped, because a 200 with any entries beats a
/// 400 that hides reachable repositories. Only when every identity failed is
/// the accumulated error list surfaced as a 400.
#[instrument(skip(context))]
pub async fn handle_catalog(context: &ServerContext) -> Result<Response<Body>, Error> {
    let mut repositories: Vec<(String, String)> = Vec::new();
    let mut errors: Vec<ApiError> = Vec::new();
    let mut successes: usize = 0;

    for identity in context.identities.iter() {
        let packages = match context.client.list_packages(identity).await {
            Ok(packages) => packages,
            Err(err) => {
                warn!("ListPackages for {identity:?} failed: {err}");
                errors.push(ApiError::unknown(format!("ListPackages: {err}")));
                continue;
            }
        };
        successes += 1;

        let mut new_packages: usize = 0;
        for package in packages {
            let (Some(name), Some(login)) = (
                package.name,
                package.owner.and_then(|owner| owner.login),
            ) else {
                continue;
            };

            if !repositories
                .iter()
                .any(|(known_login, known_name)| *known_login == login && *known_name == name)
            {
                repositories.push((login, name));
                new_packages += 1;
            }
        }
        info!("ListPackages for {identity:?} found {new_packages} new packages");
    }

    if successes == 0 {
        return json_response(StatusCode::BAD_REQUEST, &ErrorEnvelope { errors });
    }

    let catalog = Catalog {
        repositories: repositories
            .into_iter()
            .map(|(login, name)| format!("{login}/{name}"))
            .collect(),
    };

    json_response(StatusCode::OK, &catalog)
}

/// `GET /v2/{owner}/{name}/tags/list`
///
/// Projects the origin-API version list onto the registry tag list: tags are
/// concatenated in version order, versions without container metadata
/// contribute nothing. The `name` field is rebuilt from the request path,
/// never taken from origin-API echoes. Unlike the catalog there is only one
/// origin call here, so its failure surfaces directly.
#[instrument(skip(context))]
pub async fn handle_list_tags(
    context: &ServerContext,
    owner: &str,
    name: &str,
) -> Result<Response<Body>, Error> {
    let versions = context
        .client
        .list_package_versions(owner, name)
        .await
        .map_err(|err| Error::Origin(format!("PackageGetAllVersions: {err}")))?;

    let mut tags: Vec<String> = Vec::new();
    for version in versions {
        let Some(container) = version.metadata.and_then(|metadata| metadata.container) else {
            continue;
        };
        tags.extend(container.tags);
    }

    let list = TagList {
        name: format!("{owner}/{name}"),
        tags,
    };

    json_response(StatusCode::OK, &list)
}
