//! Posts API scenarios.

use crate::api::{check_post_collection, check_post_shape, NewPost, PostPatch, PostsClient};
use crate::assertion::Assertion;
use crate::config::SuiteConfig;
use crate::driver::BrowserSession;
use crate::harness::{SuiteKind, TestCase, TestSuite};
use crate::network::{HttpMethod, MockResponse, Route};
use crate::result::WebcheckResult;
use futures::future::BoxFuture;
use serde_json::json;
use tracing::info;

/// Id that exists on the server
pub const EXISTING_POST_ID: u64 = 1;
/// Id that does not exist
pub const MISSING_POST_ID: u64 = 9999;
/// Id deleted by the plain delete case
pub const DELETE_POST_ID: u64 = 3;
/// Id deleted and then read back through an interception route
pub const INTERCEPTED_POST_ID: u64 = 10;
/// Error text of the fabricated 404
pub const MOCK_NOT_FOUND: &str = "Mock Response : Post not found";

/// Payload for the create case
#[must_use]
pub fn new_post() -> NewPost {
    NewPost::new(
        "Playwright Test Post",
        "This is a test post created using Playwright.",
        1,
    )
}

/// Payload for the full update case
#[must_use]
pub fn updated_post() -> NewPost {
    NewPost::new(
        "Updated Playwright Test Post",
        "This is an updated test post created using Playwright.",
        1,
    )
}

/// Payload for the partial update case
#[must_use]
pub fn title_patch() -> PostPatch {
    PostPatch::title("Updated Playwright Test Post")
}

/// `GET /posts` answers 200
pub fn list_posts_status<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.list_posts().await?;
        Assertion::status(200, resp.status).check()
    })
}

/// `GET /posts` is a non-empty array of well-formed posts
pub fn list_posts_structure<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.list_posts().await?;
        Assertion::status(200, resp.status).check()?;
        let count = check_post_collection(&resp.body)?;
        info!(count, "validated posts");
        Ok(())
    })
}

/// `GET /posts/1` answers 200 with id 1
pub fn get_existing_post<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.get_post(EXISTING_POST_ID).await?;
        Assertion::status(200, resp.status).check()?;
        Assertion::json_field(&resp.body, "id", &json!(EXISTING_POST_ID)).check()?;
        Assertion::has_field(&resp.body, "title").check()?;
        Assertion::has_field(&resp.body, "body").check()
    })
}

/// Reading the same post twice yields the same shape
pub fn get_post_is_stable<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let first = client.get_post(EXISTING_POST_ID).await?;
        let second = client.get_post(EXISTING_POST_ID).await?;
        Assertion::status(first.status, second.status).check()?;
        check_post_shape(&first.body)?;
        check_post_shape(&second.body)?;
        Assertion::equals(&first.body["id"], &second.body["id"]).check()
    })
}

/// `GET /posts/9999` answers 404
pub fn get_missing_post<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.get_post(MISSING_POST_ID).await?;
        Assertion::status(404, resp.status).check()
    })
}

/// `POST /posts` answers 201
pub fn create_post_status<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.create_post(&new_post()).await?;
        Assertion::status(201, resp.status).check()
    })
}

/// `POST /posts` echoes every field and assigns an id
pub fn create_post_body<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let post = new_post();
        let resp = client.create_post(&post).await?;
        Assertion::status(201, resp.status).check()?;
        Assertion::json_field(&resp.body, "title", &json!(post.title)).check()?;
        Assertion::json_field(&resp.body, "body", &json!(post.body)).check()?;
        Assertion::json_field(&resp.body, "userId", &json!(post.user_id)).check()?;
        Assertion::has_field(&resp.body, "id").check()
    })
}

/// `PUT /posts/1` answers 200
pub fn update_post_status<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.update_post(EXISTING_POST_ID, &updated_post()).await?;
        Assertion::status(200, resp.status).check()
    })
}

/// `PUT /posts/1` reflects every field and keeps the id
pub fn update_post_body<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let post = updated_post();
        let resp = client.update_post(EXISTING_POST_ID, &post).await?;
        Assertion::status(200, resp.status).check()?;
        Assertion::json_field(&resp.body, "id", &json!(EXISTING_POST_ID)).check()?;
        Assertion::json_field(&resp.body, "title", &json!(post.title)).check()?;
        Assertion::json_field(&resp.body, "body", &json!(post.body)).check()?;
        Assertion::json_field(&resp.body, "userId", &json!(post.user_id)).check()
    })
}

/// `PATCH /posts/1` answers 200
pub fn patch_post_status<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.patch_post(EXISTING_POST_ID, &title_patch()).await?;
        Assertion::status(200, resp.status).check()
    })
}

/// `PATCH /posts/1` reflects the title and keeps the id
pub fn patch_post_body<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let patch = title_patch();
        let resp = client.patch_post(EXISTING_POST_ID, &patch).await?;
        Assertion::status(200, resp.status).check()?;
        Assertion::json_field(&resp.body, "id", &json!(EXISTING_POST_ID)).check()?;
        Assertion::json_field(&resp.body, "title", &json!(patch.title)).check()
    })
}

/// `DELETE /posts/3` answers 200 or 204
pub fn delete_post<'a>(
    client: &'a PostsClient,
    _config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let resp = client.delete_post(DELETE_POST_ID).await?;
        Assertion::status_in(&[200, 204], resp.status).check()
    })
}

/// Route answering `GET <post_url>` with the fabricated 404
#[must_use]
pub fn not_found_route(post_url: &str) -> Route {
    Route::new(
        post_url,
        HttpMethod::Get,
        MockResponse::error(404, MOCK_NOT_FOUND).with_header("Access-Control-Allow-Origin", "*"),
    )
}

/// Delete post 10, then read it from the page through a route that fakes a 404
pub fn delete_then_get_intercepted<'a>(
    session: &'a mut dyn BrowserSession,
    config: &'a SuiteConfig,
) -> BoxFuture<'a, WebcheckResult<()>> {
    Box::pin(async move {
        let client = PostsClient::from_config(config)?;
        let url = client.post_url(INTERCEPTED_POST_ID);
        session.route(not_found_route(&url)).await?;

        let deleted = client.delete_post(INTERCEPTED_POST_ID).await?;
        info!(status = deleted.status, "delete issued");

        let resp = session.fetch(&url, HttpMethod::Get).await?;
        Assertion::status(404, resp.status).check()?;
        Assertion::json_field(&resp.json()?, "error", &json!(MOCK_NOT_FOUND)).check()
    })
}

/// All posts API cases
#[must_use]
pub fn api_suite() -> TestSuite {
    let mut suite = TestSuite::new("api");
    suite.add_test(TestCase::api(
        "Validate GET /posts endpoint should return 200 OK status",
        list_posts_status,
    ));
    suite.add_test(TestCase::api(
        "Validate GET /posts endpoint should return an array with the correct structure",
        list_posts_structure,
    ));
    suite.add_test(TestCase::api(
        "Validate GET /posts/{id} returns 200 OK for a valid post ID",
        get_existing_post,
    ));
    suite.add_test(TestCase::api(
        "Validate GET /posts/{id} returns the same structure on repeated reads",
        get_post_is_stable,
    ));
    suite.add_test(TestCase::api(
        "Validate GET /posts/{id} returns 404 for an invalid post ID",
        get_missing_post,
    ));
    suite.add_test(TestCase::api(
        "Validate that new post is created successfully with status code as 201 Created in the response",
        create_post_status,
    ));
    suite.add_test(TestCase::api(
        "Validate response body includes the sent data and assigned ID",
        create_post_body,
    ));
    suite.add_test(TestCase::api(
        "Validate that post is updated successfully with status code 200 OK",
        update_post_status,
    ));
    suite.add_test(TestCase::api(
        "Validate response body includes updated data and remains consistent with the ID",
        update_post_body,
    ));
    suite.add_test(TestCase::api(
        "Validate that post is patched successfully with status code 200 OK",
        patch_post_status,
    ));
    suite.add_test(TestCase::api(
        "Validate response body includes Patch data and remains consistent with the ID",
        patch_post_body,
    ));
    suite.add_test(TestCase::api(
        "Validate that post is deleted successfully with status code 200 or 204",
        delete_post,
    ));
    suite.add_test(
        TestCase::ui(
            "Validate that deleted post returns 404 on GET request (mocked)",
            delete_then_get_intercepted,
        )
        .in_suite(SuiteKind::Api),
    );
    suite
}
