//! Built-in templates for a containerised Django deployment
//!
//! `podplate scaffold` writes every entry to its template path. The first
//! entry is the variable document itself; the rest are rendered from it by
//! `podplate interpolate` into their output paths.

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::RenderJob;
use crate::error::{EngineError, Result};
use crate::suggestions::suggest_template;

/// Where `interpolate` looks for variables when none are given
pub const DEFAULT_VARIABLES_FILE: &str = "config/templates/template-envs.yaml";

/// Directories created by `scaffold`, relative to the project root
pub const DIRECTORIES: &[&str] = &[
    "config",
    "config/templates",
    "config/gunicorn",
    "config/nginx",
    "config/nginx/conf.d",
    "config/templates/secrets",
    "secrets",
    "config/templates/configmaps",
    "configmaps",
];

/// What a catalog entry is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// The variable document; scaffolded but never rendered
    Variables,
    /// A template rendered into its output path
    Render,
}

/// A template shipped with podplate
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTemplate {
    pub name: &'static str,
    pub kind: TemplateKind,
    /// Where `scaffold` writes the template, relative to the project root
    pub template_path: &'static str,
    /// Where `interpolate` writes the rendered file, relative to the project root
    pub output_path: &'static str,
    pub data: &'static str,
}

impl BuiltinTemplate {
    pub fn template_path_in(&self, root: &Path) -> PathBuf {
        root.join(self.template_path)
    }

    pub fn output_path_in(&self, root: &Path) -> PathBuf {
        root.join(self.output_path)
    }

    pub fn is_rendered(&self) -> bool {
        self.kind == TemplateKind::Render
    }
}

/// Every built-in template, variable document first
pub fn builtin_templates() -> &'static [BuiltinTemplate] {
    CATALOG
}

/// Built-in templates that are rendered from the variable document
pub fn rendered_templates() -> impl Iterator<Item = &'static BuiltinTemplate> {
    CATALOG.iter().filter(|t| t.is_rendered())
}

/// The built-in variable document
pub fn variables_template() -> &'static BuiltinTemplate {
    &CATALOG[0]
}

/// Look up a built-in template by name
pub fn find(name: &str) -> Result<&'static BuiltinTemplate> {
    CATALOG
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| EngineError::UnknownTemplate {
            name: name.to_string(),
            suggestion: suggest_template(name, CATALOG.iter().map(|t| t.name)),
        })
}

/// Read the scaffolded template files under `root` into render jobs
pub fn jobs_from_disk(root: &Path) -> Result<Vec<RenderJob>> {
    rendered_templates()
        .map(|template| {
            let path = template.template_path_in(root);
            let content = fs::read_to_string(&path).map_err(|source| EngineError::TemplateFile {
                path: path.display().to_string(),
                source,
            })?;
            Ok(RenderJob::new(template.name, content, template.output_path_in(root)))
        })
        .collect()
}

const CATALOG: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "template-envs.yaml",
        kind: TemplateKind::Variables,
        template_path: "config/templates/template-envs.yaml",
        output_path: "config/templates/template-envs.yaml",
        data: TEMPLATE_ENVS,
    },
    BuiltinTemplate {
        name: "Containerfile-template",
        kind: TemplateKind::Render,
        template_path: "config/templates/Containerfile-template",
        output_path: "Containerfile",
        data: CONTAINERFILE,
    },
    BuiltinTemplate {
        name: "play-kube-template.yaml",
        kind: TemplateKind::Render,
        template_path: "config/templates/play-kube-template.yaml",
        output_path: "play-kube.yaml",
        data: PLAY_KUBE,
    },
    BuiltinTemplate {
        name: "entrypoint-template",
        kind: TemplateKind::Render,
        template_path: "config/templates/entrypoint-template",
        output_path: "entrypoint.sh",
        data: ENTRYPOINT,
    },
    BuiltinTemplate {
        name: "gunicorn-template.conf",
        kind: TemplateKind::Render,
        template_path: "config/templates/gunicorn-template.conf",
        output_path: "config/gunicorn/gunicorn.conf",
        data: GUNICORN,
    },
    BuiltinTemplate {
        name: "nginx-template.conf",
        kind: TemplateKind::Render,
        template_path: "config/templates/nginx-template.conf",
        output_path: "config/nginx/nginx.conf",
        data: NGINX_CONFIG,
    },
    BuiltinTemplate {
        name: "nginx-template-local.conf",
        kind: TemplateKind::Render,
        template_path: "config/templates/nginx-template-local.conf",
        output_path: "config/nginx/conf.d/local.conf",
        data: NGINX_LOCAL,
    },
    BuiltinTemplate {
        name: "django-env-map-template.yaml",
        kind: TemplateKind::Render,
        template_path: "config/templates/configmaps/django-env-map-template.yaml",
        output_path: "configmaps/django-env-map.yaml",
        data: DJANGO_CONFIGMAP,
    },
    BuiltinTemplate {
        name: "postgres-env-map-template.yaml",
        kind: TemplateKind::Render,
        template_path: "config/templates/configmaps/postgres-env-map-template.yaml",
        output_path: "configmaps/postgres-env-map.yaml",
        data: POSTGRES_CONFIGMAP,
    },
    BuiltinTemplate {
        name: "django-secrets-template.yaml",
        kind: TemplateKind::Render,
        template_path: "config/templates/secrets/django-secrets-template.yaml",
        output_path: "secrets/django-secrets-template.yaml",
        data: DJANGO_SECRET,
    },
    BuiltinTemplate {
        name: "postgres-secrets-template.yaml",
        kind: TemplateKind::Render,
        template_path: "config/templates/secrets/postgres-secrets-template.yaml",
        output_path: "secrets/postgres-secrets-template.yaml",
        data: POSTGRES_SECRET,
    },
];

const TEMPLATE_ENVS: &str = r#"# Every variable used by the templates lives in this file.
# Sections only group variables; all keys share one namespace,
# and a key defined twice keeps its last value.
#
# Values MUST be quoted strings, e.g. WORKER_PROCESSES: "5".
# A value may reference other variables with ${KEY}.
#
# This file holds secrets. Keep it out of version control and
# out of production images.
GENERAL:
  TIMESTAMP: "null"
  COMPOSE_PROJECT_NAME: ""
  APP_NAME: "your-app"
  APP_SOURCE_ROOT: ""
  APP_ROOT: "${APP_NAME}"
  APP_PORT: "8000"
  ALLOWED_HOSTS: "localhost"
DJANGO:
  DJANGO_ENV: "DEBUG"
  DJANGO_SECRET: ""
  DJANGO_DB_USER: ""
  DJANGO_DB_PASSWORD: ""
  DJANGO_DB_PORT: "5432"
  DJANGO_SETTINGS_MODULE: "${APP_NAME}.settings"
  DJANGO_DB: "${APP_NAME}"
  DJANGO_DB_HOST: "${DBSERVICE_NAME}"
POSTGRES:
  POSTGRES_DB: "${DJANGO_DB}"
  POSTGRES_USER: "${DJANGO_DB_USER}"
  POSTGRES_PASSWORD: "${DJANGO_DB_PASSWORD}"
  POSTGRES_DB_PORT: "${DJANGO_DB_PORT}"
  POSTGRES_VERSION: "docker.io/library/postgres:latest"
  POSTGRES_MOUNT: "/var/lib/postgresql/data"
NGINX:
  WORKER_PROCESSES: "5"
  WORKER_RLIMIT_NOFILE: "8192"
  WORKER_CONNECTIONS: "1024"
  NGINX_IMAGE_VERSION: "docker.io/library/nginx:latest"
GUNICORN:
  GUNICORN_LOG_LEVEL: "info"
  GUNICORN_WORKERS: "2"
  GUNICORN_TIMEOUT: "90"
  GUNICORN_RELOAD: "--reload" # drop in production
MEMCACHED:
  MEMCACHED_PORT: "11211"
  MEMCACHED_LOCATION: "${MEMCACHED_NAME}:${MEMCACHED_PORT}"
  MEMCACHED_IMAGE_VERSION: "docker.io/bitnami/memcached:latest"
SERVICE_NAMES:
  APPSERVICE_NAME: "${APP_NAME}-app"
  PROXYSERVICE_NAME: "${APP_NAME}-nginx"
  DBSERVICE_NAME: "${APP_NAME}" # must match the database name
  MEMCACHED_NAME: "${APP_NAME}-memcached"
CONFIGFILE:
  IMAGE: "3.12-bullseye"
SERVICE_VOLUMES:
  VOLUME_NAME: "${APP_NAME}"
  VOLUME_PREFIX: "${COMPOSE_PROJECT_NAME}"
"#;

const CONTAINERFILE: &str = r#"FROM docker.io/library/python:${IMAGE}

ENV PYTHONUNBUFFERED=1
ENV PYTHONFAULTHANDLER=1
ENV PIP_ROOT_USER_ACTION=ignore
ENV PATH="/root/.local/bin/:$PATH"

WORKDIR /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/src

RUN mkdir -p /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/static \
    /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/media
VOLUME /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/static
VOLUME /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/media

COPY pyproject.toml README.md ./
COPY ${APP_ROOT}/__about__.py ./${APP_ROOT}/__about__.py

RUN pip install --user --upgrade pip setuptools \
    && pip install --user .
"#;

const PLAY_KUBE: &str = r#"# Generated from play-kube-template.yaml; edit the template, not this file.
# Run with: podman kube play --replace play-kube.yaml \
#   --configmap configmaps/django-env-map.yaml \
#   --configmap configmaps/postgres-env-map.yaml
apiVersion: v1
kind: Pod
metadata:
  creationTimestamp: ${TIMESTAMP}
  labels:
    app: ${APP_NAME}-pod
  name: ${APP_NAME}-pod
spec:
  restartPolicy: Always
  containers:
    - name: ${DBSERVICE_NAME}
      image: ${POSTGRES_VERSION}
      args:
        - postgres
      env:
        - name: POSTGRES_DB
          valueFrom:
            configMapKeyRef:
              name: postgres-env
              key: POSTGRES_DB
        - name: POSTGRES_USER
          valueFrom:
            configMapKeyRef:
              name: postgres-env
              key: POSTGRES_USER
        - name: POSTGRES_PASSWORD
          valueFrom:
            secretKeyRef:
              name: postgres-credentials
              key: POSTGRES_PASSWORD
      ports:
        - name: postgresql
          containerPort: ${POSTGRES_DB_PORT}
      livenessProbe:
        exec:
          command:
            - /bin/sh
            - -c
            - exec pg_isready -d ${POSTGRES_DB} -U ${POSTGRES_USER} -h 127.0.0.1 -p ${POSTGRES_DB_PORT}
        initialDelaySeconds: 30
        periodSeconds: 10
      volumeMounts:
        - mountPath: ${POSTGRES_MOUNT}
          name: ${DBSERVICE_NAME}-volume-pvc
    - name: ${MEMCACHED_NAME}
      image: ${MEMCACHED_IMAGE_VERSION}
      ports:
        - containerPort: ${MEMCACHED_PORT}
      securityContext:
        runAsNonRoot: true
    - name: ${APPSERVICE_NAME}
      image: localhost/${APPSERVICE_NAME}:latest
      command:
        - /bin/sh
        - /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/src/entrypoint.sh
      args:
        - gunicorn
        - -c
        - config/gunicorn/gunicorn.conf
        - --chdir
        - ${APP_ROOT}
        - --bind
        - ":${APP_PORT}"
        - ${APP_ROOT}.wsgi:application
        - ${GUNICORN_RELOAD}
      envFrom:
        - configMapRef:
            name: django-env
        - secretRef:
            name: django-credentials
      ports:
        - containerPort: ${APP_PORT}
      readinessProbe:
        httpGet:
          path: "/"
          port: ${APP_PORT}
        initialDelaySeconds: 30
        periodSeconds: 10
      securityContext:
        runAsNonRoot: true
      volumeMounts:
        - mountPath: /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/src:Z
          name: ${VOLUME_NAME}-host-0
        - mountPath: /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/static:Z
          name: ${VOLUME_NAME}-static-volume-pvc
        - mountPath: /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/media:Z
          name: ${VOLUME_NAME}-media-volume-pvc
    - name: ${PROXYSERVICE_NAME}
      image: ${NGINX_IMAGE_VERSION}
      args:
        - nginx
        - -g
        - daemon off;
      ports:
        - name: http
          containerPort: 80
          hostPort: ${APP_PORT}
      volumeMounts:
        - mountPath: /etc/nginx/nginx.conf:Z
          name: ${PROXYSERVICE_NAME}-conf-host-0
          readOnly: true
        - mountPath: /etc/nginx/conf.d:Z
          name: ${PROXYSERVICE_NAME}-conf-d-host-1
        - mountPath: /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/static:Z
          name: ${VOLUME_NAME}-static-volume-pvc
        - mountPath: /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/media:Z
          name: ${VOLUME_NAME}-media-volume-pvc
  volumes:
    - name: ${DBSERVICE_NAME}-volume-pvc
      persistentVolumeClaim:
        claimName: ${DBSERVICE_NAME}-volume
    - name: ${VOLUME_NAME}-host-0
      hostPath:
        path: ${APP_SOURCE_ROOT}
        type: Directory
    - name: ${VOLUME_NAME}-static-volume-pvc
      persistentVolumeClaim:
        claimName: ${VOLUME_NAME}-static-volume
    - name: ${VOLUME_NAME}-media-volume-pvc
      persistentVolumeClaim:
        claimName: ${VOLUME_NAME}-media-volume
    - name: ${PROXYSERVICE_NAME}-conf-host-0
      hostPath:
        path: ${APP_SOURCE_ROOT}/config/nginx/nginx.conf
        type: File
    - name: ${PROXYSERVICE_NAME}-conf-d-host-1
      hostPath:
        path: ${APP_SOURCE_ROOT}/config/nginx/conf.d
        type: Directory
"#;

const ENTRYPOINT: &str = r#"#!/bin/bash -x

python ${APP_ROOT}/manage.py migrate --no-input || exit 1
python ${APP_ROOT}/manage.py collectstatic --no-input || exit 1
exec "$@"
"#;

const GUNICORN: &str = r#"name = '${APP_NAME}'
loglevel = '${GUNICORN_LOG_LEVEL}'
errorlog = '-'
accesslog = '-'
workers = ${GUNICORN_WORKERS}
timeout = ${GUNICORN_TIMEOUT}
"#;

const NGINX_CONFIG: &str = r#"user  nginx;
worker_processes  ${WORKER_PROCESSES};

error_log  /var/log/nginx/error.log warn;
pid        /var/run/nginx.pid;

worker_rlimit_nofile  ${WORKER_RLIMIT_NOFILE};

events {
    worker_connections  ${WORKER_CONNECTIONS};
}

http {
    include       /etc/nginx/mime.types;
    default_type  application/octet-stream;

    log_format  main  '$remote_addr - $remote_user [$time_local] "$request" '
                      '$status $body_bytes_sent "$http_referer" '
                      '"$http_user_agent" "$http_x_forwarded_for"';

    access_log  /var/log/nginx/access.log  main;

    sendfile        on;
    keepalive_timeout  65;
    proxy_read_timeout 300;
    proxy_connect_timeout 300;
    proxy_send_timeout 300;

    include /etc/nginx/conf.d/*.conf;
}
"#;

const NGINX_LOCAL: &str = r#"upstream ${APPSERVICE_NAME}_upstream {
    server ${APPSERVICE_NAME}:${APP_PORT};
}

server {
    listen 80;
    server_name localhost;

    location /static/ {
        alias /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/static/;
    }

    location /media/ {
        alias /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/media/;
    }

    location / {
        root /opt/services/${VOLUME_PREFIX}${VOLUME_NAME}/static/;
        try_files /maintenance/maintenance.html @proxy;
    }

    location @proxy {
        set $forwarded_scheme "https";
        client_max_body_size 2M;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header Host $host;
        proxy_set_header X-Forwarded-Proto $forwarded_scheme;
        proxy_redirect off;
        proxy_pass http://${APPSERVICE_NAME}_upstream;
    }
}
"#;

const DJANGO_CONFIGMAP: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: django-env
data:
  DJANGO_ENV: "${DJANGO_ENV}"
  ALLOWED_HOSTS: "${ALLOWED_HOSTS}"
  DJANGO_DB: "${DJANGO_DB}"
  DJANGO_DB_USER: "${DJANGO_DB_USER}"
  DJANGO_DB_HOST: "${DJANGO_DB_HOST}"
  DJANGO_DB_PORT: "${DJANGO_DB_PORT}"
  DJANGO_SETTINGS_MODULE: "${DJANGO_SETTINGS_MODULE}"
  MEMCACHED_LOCATION: "${MEMCACHED_LOCATION}"
  MEMCACHED_PORT: "${MEMCACHED_PORT}"
"#;

const POSTGRES_CONFIGMAP: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: postgres-env
data:
  POSTGRES_DB: "${POSTGRES_DB}"
  POSTGRES_USER: "${POSTGRES_USER}"
"#;

const DJANGO_SECRET: &str = r#"apiVersion: v1
kind: Secret
metadata:
  creationTimestamp: null
  name: django-credentials
data:
  DJANGO_SECRET: "${DJANGO_SECRET}"
  DJANGO_DB_PASSWORD: "${DJANGO_DB_PASSWORD}"
"#;

const POSTGRES_SECRET: &str = r#"apiVersion: v1
kind: Secret
metadata:
  creationTimestamp: null
  name: postgres-credentials
data:
  POSTGRES_PASSWORD: "${POSTGRES_PASSWORD}"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substitute::{substitute, unresolved_placeholders};
    use podplate_core::VariableDocument;
    use podplate_core::placeholder::placeholders;

    #[test]
    fn test_variables_document_resolves() {
        let doc = VariableDocument::from_yaml(variables_template().data).unwrap();
        let values = doc.resolve().unwrap();

        assert_eq!(values.get("POSTGRES_DB"), Some("your-app"));
        assert_eq!(values.get("DJANGO_DB_HOST"), Some("your-app"));
        assert_eq!(values.get("MEMCACHED_LOCATION"), Some("your-app-memcached:11211"));
        assert!(values.dangling_references().is_empty());
    }

    #[test]
    fn test_every_placeholder_is_defined() {
        let values = VariableDocument::from_yaml(variables_template().data)
            .unwrap()
            .resolve()
            .unwrap();

        for template in rendered_templates() {
            for placeholder in placeholders(template.data) {
                assert!(
                    values.contains_key(placeholder.key),
                    "{} uses undefined ${{{}}}",
                    template.name,
                    placeholder.key
                );
            }
        }
    }

    #[test]
    fn test_rendered_yaml_templates_parse() {
        let values = VariableDocument::from_yaml(variables_template().data)
            .unwrap()
            .resolve()
            .unwrap();

        for template in rendered_templates().filter(|t| t.output_path.ends_with(".yaml")) {
            let rendered = substitute(template.data, &values);
            assert!(unresolved_placeholders(&rendered, &values).is_empty());
            serde_yaml::from_str::<serde_yaml::Value>(&rendered)
                .unwrap_or_else(|e| panic!("{} is not valid YAML: {e}", template.name));
        }
    }

    #[test]
    fn test_catalog_shape() {
        assert_eq!(builtin_templates().len(), 11);
        assert_eq!(variables_template().kind, TemplateKind::Variables);
        assert_eq!(variables_template().template_path, DEFAULT_VARIABLES_FILE);
        assert_eq!(rendered_templates().count(), 10);

        for template in builtin_templates() {
            let parent = Path::new(template.template_path).parent().unwrap();
            assert!(
                DIRECTORIES.contains(&parent.to_str().unwrap()),
                "{} is outside the scaffolded directories",
                template.template_path
            );
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("gunicorn-template.conf").unwrap().output_path, "config/gunicorn/gunicorn.conf");

        let err = find("gunicorn-templat.conf").unwrap_err();
        match err {
            EngineError::UnknownTemplate { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("did you mean `gunicorn-template.conf`?"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_jobs_from_disk_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = jobs_from_disk(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::TemplateFile { .. }));
    }

    #[test]
    fn test_jobs_from_disk_reads_scaffolded_templates() {
        let dir = tempfile::tempdir().unwrap();
        for template in rendered_templates() {
            let path = template.template_path_in(dir.path());
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, template.data).unwrap();
        }

        let jobs = jobs_from_disk(dir.path()).unwrap();
        assert_eq!(jobs.len(), rendered_templates().count());
        assert_eq!(jobs[0].output_path, CATALOG[1].output_path_in(dir.path()));
    }
}
