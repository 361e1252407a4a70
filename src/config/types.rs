use serde::{Deserialize, Serialize};

use crate::engine::StageKind;

/// Default buildpack used to serve the static build output
pub const DEFAULT_BUILDPACK_URL: &str = "https://github.com/heroku/heroku-buildpack-static.git";

/// Runtime packages added to every generated app
pub const DEFAULT_DEPENDENCIES: &[&str] = &[
    "react",
    "react-dom",
    "react-helmet",
    "react-router-dom",
    "fs-extra",
    "prop-types",
];

/// Development packages added to every generated app
pub const DEFAULT_DEV_DEPENDENCIES: &[&str] = &[
    "babel-core",
    "babel-eslint",
    "babel-jest",
    "babel-loader",
    "babel-plugin-transform-es2015-modules-commonjs",
    "babel-plugin-transform-object-rest-spread",
    "babel-preset-env",
    "babel-preset-react",
    "cross-env",
    "css-loader",
    "enzyme",
    "enzyme-adapter-react-16",
    "eslint",
    "eslint-config-airbnb",
    "eslint-plugin-import",
    "eslint-plugin-jsx-a11y",
    "eslint-plugin-react",
    "file-loader",
    "html-webpack-plugin",
    "identity-obj-proxy",
    "jest",
    "react-hot-loader",
    "style-loader",
    "url-loader",
    "webpack",
    "webpack-cli",
    "webpack-dev-server",
];

/// Settings for a scaffolding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Package manager used to add dependencies and run scripts
    pub package_manager: String,

    /// Tool that creates the initial manifest (`<tool> init -y`)
    pub init_tool: String,

    /// Version control tool
    pub vcs: String,

    /// Hosting platform CLI
    pub hosting_cli: String,

    /// Buildpack the hosting app is created with
    pub buildpack_url: String,

    /// Treat a missing manifest placeholder as an error instead of a no-op
    pub strict_manifest: bool,

    /// Run the start script after the first build
    pub start_after_build: bool,

    /// Commit and push the new app to the hosting remote
    pub deploy: bool,

    /// Stages that should not run
    pub skip: Vec<StageKind>,

    pub dependencies: Vec<String>,

    pub dev_dependencies: Vec<String>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            package_manager: "yarn".to_string(),
            init_tool: "npm".to_string(),
            vcs: "git".to_string(),
            hosting_cli: "heroku".to_string(),
            buildpack_url: DEFAULT_BUILDPACK_URL.to_string(),
            strict_manifest: false,
            start_after_build: true,
            deploy: false,
            skip: Vec::new(),
            dependencies: DEFAULT_DEPENDENCIES.iter().map(|s| s.to_string()).collect(),
            dev_dependencies: DEFAULT_DEV_DEPENDENCIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ScaffoldConfig {
    pub fn is_skipped(&self, stage: StageKind) -> bool {
        self.skip.contains(&stage)
    }

    /// External tools the configured pipeline will invoke
    pub fn required_tools(&self) -> Vec<&str> {
        let mut tools = vec![self.init_tool.as_str()];
        for tool in [
            self.package_manager.as_str(),
            self.vcs.as_str(),
            self.hosting_cli.as_str(),
        ] {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }
        tools
    }
}

/// Overrides collected from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub skip: Vec<StageKind>,
    pub no_start: bool,
    pub deploy: bool,
    pub strict_manifest: bool,
}

impl ConfigOverrides {
    /// Apply on top of file settings; flags only ever switch behavior on
    pub fn apply(self, config: &mut ScaffoldConfig) {
        for stage in self.skip {
            if !config.skip.contains(&stage) {
                config.skip.push(stage);
            }
        }
        if self.no_start {
            config.start_after_build = false;
        }
        if self.deploy {
            config.deploy = true;
        }
        if self.strict_manifest {
            config.strict_manifest = true;
        }
    }
}
