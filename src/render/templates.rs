//! render::templates
//!
//! Manifest template bodies.
//!
//! These are pure substitution templates: every `{{ var }}` maps to one
//! field of the matching model struct and there is no control flow. The
//! YAML comments inside the bodies end up in the generated files for the
//! benefit of whoever reads them in the deployment repository.

/// Strimzi KafkaConnector running the Debezium SQL Server source.
pub const SOURCE_CONNECTOR: &str = r#"apiVersion: kafka.strimzi.io/v1beta2
kind: KafkaConnector
metadata:
  # source-debeziumsqlserver-{db}-{schema}-{group}-{mode}-{size}
  name: {{ name }}
  labels:
    strimzi.io/cluster: {{ cluster_name }}
spec:
  autoRestart:
    enabled: true
  class: io.debezium.connector.sqlserver.SqlServerConnector
  tasksMax: 1
  config:
    # SQL Server connection
    database.hostname: "{{ database_host }}"
    database.port: "{{ database_port }}"
    database.user: "${secrets:{{ database_secret }}:user}"
    database.password: "${secrets:{{ database_secret }}:password}"
    database.names: "{{ database_name_upper }}"
    database.encrypt: false

    # Topics and tables
    topic.prefix: "{{ topic_prefix }}"
    table.include.list: "{{ table_include_list }}"

    # Type handling / tombstones
    decimal.handling.mode: "string"
    tombstones.on.delete: false

    # Debezium internal schema history
    schema.history.internal.kafka.bootstrap.servers: "{{ schema_history_bootstrap_servers }}"
    schema.history.internal.kafka.topic: "{{ schema_history_topic }}"

    # Converters (Avro) + Schema Registry
    value.converter: "io.confluent.connect.avro.AvroConverter"
    key.converter: "io.confluent.connect.avro.AvroConverter"
    key.converter.schemas.enable: "false"
    value.converter.schemas.enable: "true"
    key.converter.schema.registry.url: "{{ schema_registry_url }}"
    value.converter.schema.registry.url: "{{ schema_registry_url }}"

    # Snapshot and read behavior
    data.query.mode: direct
    snapshot.mode: "when_needed"
    snapshot.locking.mode: none
    snapshot.isolation.mode: read_committed
    snapshot.max.threads: 5
"#;

/// Strimzi KafkaConnector delivering one topic into the warehouse.
pub const SINK_CONNECTOR: &str = r#"apiVersion: kafka.strimzi.io/v1beta2
kind: KafkaConnector
metadata:
  # sink-jdbcsnowflake-{logical}-{db}-{table}-{mode}-{size}-v1
  name: {{ name }}
  labels:
    strimzi.io/cluster: {{ cluster_name }}
spec:
  autoRestart:
    enabled: true
  class: br.com.datastreambrasil.v3.SnowflakeSinkConnector
  tasksMax: 1
  config:
    topics: "{{ topic_name }}"
    url: "{{ snowflake_url }}"
    user: "${secrets:{{ snowflake_user_secret }}:username}"
    password: "${secrets:{{ snowflake_password_secret }}:password}"
    stage: "{{ stage }}"
    table: "{{ table }}"
    schema: "{{ schema }}"

    key.converter: "io.confluent.connect.avro.AvroConverter"
    key.converter.schema.registry.url: "{{ schema_registry_url }}"
    key.converter.schemas.enable: true
    value.converter: "io.confluent.connect.avro.AvroConverter"
    value.converter.schema.registry.url: "{{ schema_registry_url }}"
    value.converter.schemas.enable: true
"#;

/// Kubernetes Job plus SQL ConfigMap preparing the destination objects
/// for one table.
pub const SNOWFLAKE_JOB: &str = r#"apiVersion: batch/v1
kind: Job
metadata:
  name: {{ job_name }}
spec:
  backoffLimit: 0
  template:
    spec:
      restartPolicy: Never
      containers:
        - name: ubuntu
          image: ubuntu:20.04
          securityContext:
            runAsUser: 0
            privileged: true
          command: ["bin/bash", "-c"]
          volumeMounts:
            - name: cfg
              mountPath: /tmp/cfg
              readOnly: true
            - name: sql
              mountPath: /tmp/sql/script.sql
              subPath: script.sql
              readOnly: true
          args:
            - |
              apt-get update -y
              apt-get install -y curl unzip

              curl -o /tmp/snowsql-linux_x86_64.bash https://sfc-repo.snowflakecomputing.com/snowsql/bootstrap/1.3/linux_x86_64/snowsql-1.3.2-linux_x86_64.bash
              SNOWSQL_DEST=~/bin SNOWSQL_LOGIN_SHELL=~/.bashrc bash /tmp/snowsql-linux_x86_64.bash

              /root/bin/snowsql --config /tmp/cfg/snowsql.config --connection custom --filename /tmp/sql/script.sql
      volumes:
        - name: cfg
          configMap:
            name: {{ connection_config_map }}
        - name: sql
          configMap:
            name: {{ sql_config_map_name }}
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: {{ sql_config_map_name }}
data:
  script.sql: |
    USE ROLE {{ role }};
    USE DATABASE {{ database }};

    CREATE SCHEMA IF NOT EXISTS {{ schema }};
    USE SCHEMA {{ schema }};

    DROP TABLE IF EXISTS {{ table_ingest }};
    DROP TABLE IF EXISTS {{ table_final }};

    CREATE TABLE IF NOT EXISTS {{ table_ingest }} (
{{ business_columns_ddl }}      IH_TOPIC VARCHAR(255) NOT NULL,
      IH_PARTITION INT NOT NULL,
      IH_OFFSET INT NOT NULL,
      IH_OP VARCHAR(1) NOT NULL,
      IH_DATETIME TIMESTAMP_NTZ NOT NULL,
      IH_BLOCKID VARCHAR(40) NOT NULL,
      constraint pkey PRIMARY KEY (IH_TOPIC, IH_PARTITION, IH_OFFSET)
    );

    CREATE TABLE IF NOT EXISTS {{ table_final }} (
{{ business_columns_ddl }}    );

    CREATE OR REPLACE STAGE {{ stage_name }}
      FILE_FORMAT = (
        TYPE = 'CSV',
        FIELD_OPTIONALLY_ENCLOSED_BY = '"',
        SKIP_HEADER = 0,
        FIELD_DELIMITER = ';',
        NULL_IF = ('\\N', 'NULL')
      );
"#;
