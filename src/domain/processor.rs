#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Processor {
	Default,
	Fallback,
}

impl Processor {
	pub fn name(&self) -> &'static str {
		match self {
			Processor::Default => "default",
			Processor::Fallback => "fallback",
		}
	}
}

/// The two configured processor base URLs. Identity resolution is exact
/// string equality against the published `BestInstance` value.
#[derive(Debug, Clone)]
pub struct ProcessorEndpoints {
	pub default_url:  String,
	pub fallback_url: String,
}

impl ProcessorEndpoints {
	pub fn new(default_url: String, fallback_url: String) -> Self {
		Self {
			default_url,
			fallback_url,
		}
	}

	pub fn url_of(&self, processor: Processor) -> &str {
		match processor {
			Processor::Default => &self.default_url,
			Processor::Fallback => &self.fallback_url,
		}
	}

	pub fn identify(&self, url: &str) -> Option<Processor> {
		if url == self.default_url {
			Some(Processor::Default)
		} else if url == self.fallback_url {
			Some(Processor::Fallback)
		} else {
			None
		}
	}
}
