use std::collections::HashMap;

use crate::ImageId;

/// Adjacent images around the current one. `None` at either end of the ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbours {
	pub previous: Option<ImageId>,
	pub next: Option<ImageId>,
}

/// Fixed browsing order over every known image, with no wraparound.
#[derive(Debug, Default, Clone)]
pub struct Navigator {
	order: Vec<ImageId>,
	positions: HashMap<ImageId, usize>,
}

impl Navigator {
	pub fn new(ids: impl IntoIterator<Item = ImageId>) -> Self {
		let mut order = Vec::new();
		let mut positions = HashMap::new();

		for id in ids {
			if !positions.contains_key(&id) {
				positions.insert(id.clone(), order.len());
				order.push(id);
			}
		}

		Self { order, positions }
	}

	pub fn first(&self) -> Option<&ImageId> {
		self.order.first()
	}

	pub fn last(&self) -> Option<&ImageId> {
		self.order.last()
	}

	pub fn contains(&self, id: &ImageId) -> bool {
		self.positions.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Previous and next images around `id`, or `None` if `id` is not in the ordering.
	pub fn neighbours(&self, id: &ImageId) -> Option<Neighbours> {
		let position = *self.positions.get(id)?;

		Some(Neighbours {
			previous: position
				.checked_sub(1)
				.and_then(|previous| self.order.get(previous))
				.cloned(),
			next: self.order.get(position + 1).cloned(),
		})
	}
}
