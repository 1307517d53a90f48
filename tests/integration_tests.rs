use image::{ImageBuffer, Luma, Rgba};
use rand::RngCore;
use sentinel_lsb::{
    StegoError,
    cli::{HideArgs, RecoverArgs},
    handler::{handle_hide, handle_recover},
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_recover_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let hidden_image_path = dir.path().join("hidden.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler!";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        message: None,
        text: Some(source_text_path.clone()),
        dest: Some(hidden_image_path.clone()),
        force: false,
    };
    handle_hide(hide_args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 测试 handle_recover
    let recover_args = RecoverArgs {
        image: hidden_image_path.clone(),
        text: Some(recovered_text_path.clone()),
        force: false,
    };
    handle_recover(recover_args)?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证直接通过 --message 传入文本，以及未提供输出路径时的默认路径
#[test]
fn test_handle_hide_with_message_and_default_dest() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 20, 20);

    let hide_args = HideArgs {
        image: original_image_path.clone(),
        message: Some("hellolion".to_string()),
        text: None,
        dest: None,
        force: false,
    };
    handle_hide(hide_args)?;

    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    // 不指定输出文件时只打印到标准输出
    handle_recover(RecoverArgs {
        image: expected_hidden_path.clone(),
        text: None,
        force: false,
    })?;

    handle_recover(RecoverArgs {
        image: expected_hidden_path,
        text: Some(recovered_text_path.clone()),
        force: false,
    })?;
    assert_eq!(fs::read_to_string(&recovered_text_path)?, "hellolion");

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let hide_args_no_force = HideArgs {
        image: image_path.clone(),
        message: None,
        text: Some(text_path.clone()),
        dest: Some(dest_path.clone()),
        force: false,
    };

    let result = handle_hide(hide_args_no_force);
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let hide_args_with_force = HideArgs {
        image: image_path.clone(),
        message: None,
        text: Some(text_path.clone()),
        dest: Some(dest_path.clone()),
        force: true,
    };

    let result = handle_hide(hide_args_with_force);
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会写出任何输出文件
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.png");

    // 10x10x4 = 400 个样本，远小于所需的比特数
    create_test_image(&image_path, 10, 10);
    fs::write(&text_path, "a".repeat(5000))?;

    let hide_args = HideArgs {
        image: image_path,
        message: None,
        text: Some(text_path),
        dest: Some(dest_path.clone()),
        force: false,
    };
    let result = handle_hide(hide_args);

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
        assert!(matches!(
            e.downcast_ref::<StegoError>(),
            Some(StegoError::Capacity {
                required: 40016,
                available: 400
            })
        ));
    }
    assert!(!dest_path.exists(), "No output should be written on failure.");

    Ok(())
}

/// 验证灰度图像不能写入会改变通道布局的格式
#[test]
fn test_handle_hide_rejects_layout_changing_format() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("gray.png");
    let dest_path = dir.path().join("gray_hidden.bmp");

    ImageBuffer::from_pixel(16, 16, Luma([128u8])).save(&image_path)?;

    let result = handle_hide(HideArgs {
        image: image_path,
        message: Some("hellolion".to_string()),
        text: None,
        dest: Some(dest_path.clone()),
        force: false,
    });

    let err = result.expect_err("Gray samples must not be written as BMP.");
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::LossyFormat { channels: 1, .. })
    ));
    assert!(!dest_path.exists(), "No output should be written on failure.");

    Ok(())
}

/// 验证包含多字节字符的文本会被拒绝
#[test]
fn test_handle_hide_rejects_wide_characters() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);

    let result = handle_hide(HideArgs {
        image: image_path,
        message: Some("这是一个测试".to_string()),
        text: None,
        dest: Some(dest_path.clone()),
        force: false,
    });

    let err = result.expect_err("Wide characters must be rejected.");
    assert!(format!("{:#}", err).contains("cannot be represented in 8 bits"));
    assert!(!dest_path.exists());

    Ok(())
}

/// 验证从未隐写过的图像中恢复会失败
#[test]
fn test_handle_recover_without_message() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("blank.png");

    // 所有样本的最低位都是 0，不可能出现哨兵
    ImageBuffer::from_pixel(16, 16, Rgba([0u8, 2, 4, 6])).save(&image_path)?;

    let result = handle_recover(RecoverArgs {
        image: image_path,
        text: None,
        force: false,
    });

    let err = result.expect_err("Recovering from a blank image must fail.");
    assert!(format!("{:#}", err).contains("No message found"));

    Ok(())
}

/// 验证输入图像不存在时的错误
#[test]
fn test_handle_recover_missing_image() {
    let dir = tempdir().expect("Failed to create temp dir.");

    let result = handle_recover(RecoverArgs {
        image: dir.path().join("missing.png"),
        text: None,
        force: false,
    });

    let err = result.expect_err("A missing image must be reported.");
    assert!(err.to_string().contains("Unable to read image file"));
}
