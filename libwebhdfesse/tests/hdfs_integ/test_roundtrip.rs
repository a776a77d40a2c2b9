use libwebhdfesse::options::{AppendOptions, CreateOptions, MkdirsOptions, OpenOptions};

use super::common::get_client;

#[test]
fn test_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let hdfs = get_client()?;
    let dir = "tmp/webhdfesse_roundtrip";
    let file = "tmp/webhdfesse_roundtrip/Straße.txt";

    hdfs.make_dir(dir, &MkdirsOptions::default())?;
    hdfs.create_file(file, "0101", &CreateOptions::default().overwrite(true))?;
    hdfs.append_file(file, "1010", &AppendOptions::default())?;
    assert_eq!(hdfs.read_file(file, &OpenOptions::default())?, b"01011010");

    let names: Vec<_> = hdfs
        .list_dir(dir)?
        .into_entries()
        .into_iter()
        .filter_map(|e| e.path_suffix)
        .collect();
    assert_eq!(names, ["Straße.txt"]);

    hdfs.delete_file_dir(dir, true)?;
    Ok(())
}
