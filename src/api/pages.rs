//! HTML pages: the anniversary view for today or a chosen date.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use chrono::{Local, NaiveDate};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::AppState;
use crate::archive::dates::display_date;
use crate::archive::locator::{self, Anniversary};

async fn index(State(state): State<AppState>) -> Html<String> {
    render_for(&state, Local::now().date_naive()).await
}

/// An unparsable date falls back to today rather than erroring; the page is
/// a viewer, not an API.
async fn by_date(State(state): State<AppState>, Path(date): Path<String>) -> Html<String> {
    let target = date
        .parse::<NaiveDate>()
        .unwrap_or_else(|_| Local::now().date_naive());
    render_for(&state, target).await
}

async fn render_for(state: &AppState, target: NaiveDate) -> Html<String> {
    let anniversary = locator::locate(
        &state.config.archive_path,
        target,
        state.config.lookback_years,
    )
    .await;
    Html(page(&anniversary).into_string())
}

fn page(anniversary: &Anniversary) -> Markup {
    let heading = display_date(anniversary.target);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Memoria - " (heading) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { "On this day - " (heading) }
                @if anniversary.years.is_empty() {
                    p.empty { "No memories found for this date." }
                }
                @for bucket in &anniversary.years {
                    section {
                        h2 { (bucket.year) }
                        div.grid {
                            @for image in &bucket.images {
                                a href={ "/media/" (image.path) } {
                                    img src={ "/media/" (image.path) "?w=400" }
                                        alt=(image.name) loading="lazy";
                                }
                            }
                            @for video in &bucket.videos {
                                video controls preload="metadata" {
                                    source src={ "/media/" (video.path) };
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; background: #111; color: #eee; }
h2 { border-bottom: 1px solid #333; padding-bottom: .25rem; }
.grid { display: flex; flex-wrap: wrap; gap: .5rem; }
.grid img, .grid video { max-width: 400px; max-height: 300px; border-radius: 4px; }
.empty { color: #888; }
";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/date/{date}", get(by_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::locator::{MediaEntry, YearBucket};

    fn sample() -> Anniversary {
        Anniversary {
            target: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            years: vec![YearBucket {
                year: 2023,
                images: vec![MediaEntry {
                    path: "2023_07_15/beach.jpg".into(),
                    name: "beach.jpg".into(),
                    year: 2023,
                }],
                videos: vec![],
            }],
        }
    }

    #[test]
    fn test_page_links_media_with_resize_hint() {
        let markup = page(&sample()).into_string();
        assert!(markup.contains("<h2>2023</h2>"));
        assert!(markup.contains("/media/2023_07_15/beach.jpg?w=400"));
        assert!(markup.contains("July 15, 2024"));
    }

    #[test]
    fn test_page_without_years_shows_empty_state() {
        let markup = page(&Anniversary {
            target: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            years: vec![],
        })
        .into_string();
        assert!(markup.contains("No memories found"));
    }
}
