//! Landing page.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get};

use super::flash::Flash;
use super::views::welcome_page;

/// Render the landing page and consume pending flash messages.
#[get("/")]
pub async fn welcome(flash: Flash) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(welcome_page(&flash.take()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::flash::FlashKind;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};

    #[actix_web::test]
    async fn renders_call_to_action() {
        let app = actix_test::init_service(App::new().wrap(test_session_middleware()).service(welcome)).await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = actix_test::read_body(res).await;
        let html = std::str::from_utf8(&body).expect("utf8 body");
        assert!(html.contains("Create Account"));
        assert!(!html.contains("flash_"));
    }

    #[actix_web::test]
    async fn shows_pending_flash_once() {
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .service(welcome)
                .route(
                    "/seed",
                    web::get().to(|flash: Flash| async move {
                        flash.push(FlashKind::Warning, "Heads up")?;
                        Ok::<_, crate::domain::Error>(HttpResponse::NoContent().finish())
                    }),
                ),
        )
        .await;

        let seeded = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/seed").to_request()).await;
        let cookie = session_cookie(&seeded).expect("session cookie");
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/").cookie(cookie).to_request(),
        )
        .await;
        let body = actix_test::read_body(res).await;
        let html = std::str::from_utf8(&body).expect("utf8 body");
        assert!(html.contains("<div id=\"flash_warning\" class=\"alert alert-warning\">Heads up</div>"));
    }
}
