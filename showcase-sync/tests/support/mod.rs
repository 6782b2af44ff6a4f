//! In-memory catalog instance and image host for orchestrator tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use serde_json::{json, Map, Value};
use showcase_api::{actions, ActionApi, ApiError, ImageDownloader};
use showcase_core::{DatasetName, ShowcaseName, ShowcasePayload, ShowcaseRecord};

pub const SOURCE: &str = "https://source.example.org";
pub const TARGET: &str = "https://target.example.org";

/// A mutating call received by a [`FakeCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        name: String,
        image_url: String,
        uploaded: Option<Vec<u8>>,
    },
    Update {
        name: String,
        image_url: String,
        uploaded: Option<Vec<u8>>,
    },
    Associate {
        showcase: String,
        dataset: String,
    },
    Dissociate {
        showcase: String,
        dataset: String,
    },
}

#[derive(Default)]
struct State {
    order: Vec<String>,
    showcases: BTreeMap<String, Map<String, Value>>,
    datasets: BTreeMap<String, Vec<String>>,
    failing_show: Option<String>,
    uploads: u32,
}

/// One catalog instance held in memory.
///
/// Creates and updates behave like the real extension: uploaded images get a
/// fresh timestamped URL under this instance's address.
pub struct FakeCatalog {
    address: String,
    state: RefCell<State>,
    calls: RefCell<Vec<Call>>,
}

impl FakeCatalog {
    pub fn new(address: &str) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            address: address.to_owned(),
            state: RefCell::new(State::default()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_showcase(self, record: Value) -> Self {
        let Value::Object(map) = record else {
            panic!("showcase fixture must be an object");
        };
        let name = map["name"].as_str().expect("fixture name").to_owned();
        {
            let mut state = self.state.borrow_mut();
            state.order.push(name.clone());
            state.datasets.entry(name.clone()).or_default();
            state.showcases.insert(name, map);
        }
        self
    }

    pub fn with_datasets(self, showcase: &str, datasets: &[&str]) -> Self {
        self.state.borrow_mut().datasets.insert(
            showcase.to_owned(),
            datasets.iter().map(|d| d.to_string()).collect(),
        );
        self
    }

    /// Make `show_showcase` for `name` fail with a server error.
    pub fn failing_show(self, name: &str) -> Self {
        self.state.borrow_mut().failing_show = Some(name.to_owned());
        self
    }

    pub fn record(&self, name: &str) -> Option<Value> {
        self.state
            .borrow()
            .showcases
            .get(name)
            .cloned()
            .map(Value::Object)
    }

    pub fn datasets(&self, showcase: &str) -> Vec<String> {
        let mut list = self
            .state
            .borrow()
            .datasets
            .get(showcase)
            .cloned()
            .unwrap_or_default();
        list.sort();
        list
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn not_found(action: &str, id: &str) -> ApiError {
        ApiError::NotFound {
            action: action.to_owned(),
            message: format!("{id} not found"),
        }
    }

    /// Store the payload the way the extension would; returns the call record.
    fn store(&self, mut payload: ShowcasePayload) -> (String, String, Option<Vec<u8>>) {
        let name = payload.name().expect("payload name").to_owned();
        let image_url = payload.image.image_url.clone();

        let uploaded = payload.image.image_upload.take().map(|mut upload| {
            let mut bytes = Vec::new();
            upload.file.read_to_end(&mut bytes).expect("read upload");
            (upload.file_name, bytes)
        });

        let mut state = self.state.borrow_mut();
        let display_url = match &uploaded {
            Some((file_name, _)) => {
                state.uploads += 1;
                format!(
                    "{}/uploads/showcase/2024-02-{:02}-101010.{:06}{file_name}",
                    self.address,
                    state.uploads % 28 + 1,
                    state.uploads
                )
            }
            None => image_url.clone(),
        };

        let mut record: Map<String, Value> = match payload.to_json() {
            Value::Object(map) => map,
            _ => unreachable!("payload json is an object"),
        };
        record.insert("image_display_url".into(), json!(display_url));
        record.insert("tags".into(), json!([]));

        if !state.showcases.contains_key(&name) {
            state.order.push(name.clone());
        }
        state.datasets.entry(name.clone()).or_default();
        state.showcases.insert(name.clone(), record);

        (name, image_url, uploaded.map(|(_, bytes)| bytes))
    }
}

impl ActionApi for FakeCatalog {
    fn address(&self) -> &str {
        &self.address
    }

    fn list_showcases(&self) -> Result<Vec<ShowcaseName>, ApiError> {
        Ok(self
            .state
            .borrow()
            .order
            .iter()
            .map(|n| ShowcaseName::from(n.as_str()))
            .collect())
    }

    fn show_showcase(&self, id: &ShowcaseName) -> Result<ShowcaseRecord, ApiError> {
        let state = self.state.borrow();
        if state.failing_show.as_deref() == Some(id.as_str()) {
            return Err(ApiError::Action {
                action: actions::SHOW.to_owned(),
                status: 500,
                kind: "Internal Server Error".to_owned(),
                message: "boom".to_owned(),
            });
        }
        state
            .showcases
            .get(id.as_str())
            .cloned()
            .map(ShowcaseRecord::new)
            .ok_or_else(|| Self::not_found(actions::SHOW, id.as_str()))
    }

    fn create_showcase(&self, payload: ShowcasePayload) -> Result<ShowcaseRecord, ApiError> {
        let (name, image_url, uploaded) = self.store(payload);
        self.calls.borrow_mut().push(Call::Create {
            name: name.clone(),
            image_url,
            uploaded,
        });
        self.show_showcase(&ShowcaseName::from(name))
    }

    fn update_showcase(&self, payload: ShowcasePayload) -> Result<ShowcaseRecord, ApiError> {
        let name = payload.name().unwrap_or_default().to_owned();
        if !self.state.borrow().showcases.contains_key(&name) {
            return Err(Self::not_found(actions::UPDATE, &name));
        }
        let (name, image_url, uploaded) = self.store(payload);
        self.calls.borrow_mut().push(Call::Update {
            name: name.clone(),
            image_url,
            uploaded,
        });
        self.show_showcase(&ShowcaseName::from(name))
    }

    fn list_showcase_datasets(
        &self,
        showcase_id: &ShowcaseName,
    ) -> Result<Vec<DatasetName>, ApiError> {
        let state = self.state.borrow();
        if !state.showcases.contains_key(showcase_id.as_str()) {
            return Err(Self::not_found(actions::PACKAGE_LIST, showcase_id.as_str()));
        }
        Ok(state
            .datasets
            .get(showcase_id.as_str())
            .map(|list| list.iter().map(|d| DatasetName::from(d.as_str())).collect())
            .unwrap_or_default())
    }

    fn create_showcase_dataset_association(
        &self,
        showcase_id: &ShowcaseName,
        package_id: &DatasetName,
    ) -> Result<(), ApiError> {
        self.state
            .borrow_mut()
            .datasets
            .entry(showcase_id.0.clone())
            .or_default()
            .push(package_id.0.clone());
        self.calls.borrow_mut().push(Call::Associate {
            showcase: showcase_id.0.clone(),
            dataset: package_id.0.clone(),
        });
        Ok(())
    }

    fn delete_showcase_dataset_association(
        &self,
        showcase_id: &ShowcaseName,
        package_id: &DatasetName,
    ) -> Result<(), ApiError> {
        if let Some(list) = self.state.borrow_mut().datasets.get_mut(showcase_id.as_str()) {
            list.retain(|d| d != package_id.as_str());
        }
        self.calls.borrow_mut().push(Call::Dissociate {
            showcase: showcase_id.0.clone(),
            dataset: package_id.0.clone(),
        });
        Ok(())
    }
}

/// Serves fixed bytes per URL and counts every download.
#[derive(Default)]
pub struct FakeImageHost {
    images: BTreeMap<String, Vec<u8>>,
    opened: RefCell<Vec<String>>,
}

impl FakeImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_owned(), bytes.to_vec());
        self
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl ImageDownloader for FakeImageHost {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, ApiError> {
        self.opened.borrow_mut().push(url.to_owned());
        match self.images.get(url) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(ApiError::Download {
                url: url.to_owned(),
                status: 404,
            }),
        }
    }
}

/// A complete showcase fixture.
pub fn showcase(name: &str, title: &str, image: Option<&str>) -> Value {
    json!({
        "id": format!("id-{name}"),
        "name": name,
        "title": title,
        "notes": format!("About {title}."),
        "author": "Open data team",
        "author_email": "opendata@example.org",
        "type": "showcase",
        "url": format!("https://apps.example.org/{name}"),
        "state": "active",
        "image_display_url": image.unwrap_or(""),
        "tags": [{"name": "apps", "display_name": "apps", "state": "active"}],
    })
}
