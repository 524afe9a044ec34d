/*!
# farmweb

Web exercises for a farm-standards survey site, served with axum.

## Overview

The site bundles a handful of small pages:

- a per-visitor todo list kept in memory and keyed by a random identity cookie,
- a blog whose pages proxy a public JSON posts API,
- the survey status table and the farmers' survey progress.

## Architecture

### Todo list
- **Identity** - every visitor is identified by a `userid` cookie holding a v4 UUID.
  The first page load without one mints it and sets it for path `/`.
- **Store** - [`todo::TodoStore`] maps identities to ordered lists behind one lock.
  A list is created on first access with a single seeded item.
- **Actions** - create, delete and toggle forms post back and redirect to `/`.
  They require the cookie from an earlier page load.

### Blog
- `GET /blog` lists `{slug, title}` summaries of `<upstream>/posts`.
- `GET /blog/{slug}` shows `<upstream>/posts/{slug}` as `{title, content}`.
- Upstream failures are logged and the page renders without data;
  a missing post renders a 404 page.

### Survey data
- Static aspect tables in [`survey`], farmer records in [`farmers`].

## Routes

- `/` - todo page, `/api/todos` - the same list as JSON
- `/todos`, `/todos/delete`, `/todos/toggle` - form actions
- `/blog`, `/blog/{slug}` - blog pages
- `/status`, `/api/status`, `/api/survey` - survey tables
- `/farmers/{id}`, `/api/farmers`, `/api/farmers/{id}` - farmer records
- `/images/{file}` - static card images

## Configuration

| Variable | Default |
|---|---|
| `FARMWEB_HOST` | `127.0.0.1` |
| `FARMWEB_PORT` | `3000` |
| `FARMWEB_BLOG_URL` | `https://jsonplaceholder.typicode.com` |
| `FARMWEB_ASSETS_DIR` | `static/images` |

Logging goes through `env_logger`; set `RUST_LOG` to change the level.
*/

pub mod config;
pub mod farmers;
pub mod identity;
pub mod survey;
pub mod todo;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod blog;
#[cfg(feature = "web")]
pub mod error;
#[cfg(feature = "web")]
pub mod pages;

pub use identity::{ResolvedIdentity, resolve_identity};
pub use todo::{StoreError, TodoItem, TodoStore};
